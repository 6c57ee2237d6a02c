use crate::constants::env as env_keys;
use crate::errors::ToolError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn from_env() -> Self {
        match std::env::var(env_keys::LOG_LEVEL)
            .unwrap_or_else(|_| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }

    fn allows(self, other: LogLevel) -> bool {
        other.rank() <= self.rank()
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Where log lines go. stdout is reserved for the stdio transport, so the
/// default is to drop everything.
#[derive(Debug, Clone)]
enum LogSink {
    Discard,
    File(Arc<FileSink>),
}

#[derive(Debug)]
struct FileSink {
    file: Mutex<File>,
    failed: AtomicBool,
}

impl FileSink {
    fn new(file: File) -> Self {
        Self {
            file: Mutex::new(file),
            failed: AtomicBool::new(false),
        }
    }

    fn write_line(&self, line: &str) {
        let result = match self.file.lock() {
            Ok(mut guard) => writeln!(guard, "{}", line).map_err(|err| err.to_string()),
            Err(_) => Err("log file lock poisoned".to_string()),
        };
        if let Err(reason) = result {
            self.report_failure(&reason);
        }
    }

    /// Tells stderr about the first lost line only. Returns whether it did.
    fn report_failure(&self, reason: &str) -> bool {
        if self.failed.swap(true, Ordering::Relaxed) {
            return false;
        }
        eprintln!(
            "[{}] log file write failed, later failures are not reported: {}",
            crate::constants::server::NAME,
            reason
        );
        true
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    context: String,
    level: LogLevel,
    sink: LogSink,
}

impl Logger {
    pub fn new(context: &str) -> Self {
        Self {
            context: context.to_string(),
            level: LogLevel::from_env(),
            sink: LogSink::Discard,
        }
    }

    pub fn with_file(context: &str, path: &Path) -> Result<Self, ToolError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| {
                ToolError::internal(format!(
                    "Failed to open log file {}: {}",
                    path.display(),
                    err
                ))
            })?;
        Ok(Self {
            context: context.to_string(),
            level: LogLevel::from_env(),
            sink: LogSink::File(Arc::new(FileSink::new(file))),
        })
    }

    pub fn child(&self, suffix: &str) -> Self {
        let context = if suffix.is_empty() {
            self.context.clone()
        } else {
            format!("{}:{}", self.context, suffix)
        };
        Self {
            context,
            level: self.level,
            sink: self.sink.clone(),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn log(&self, level: LogLevel, message: &str, meta: Option<&serde_json::Value>) {
        if !self.level.allows(level) {
            return;
        }
        let LogSink::File(file) = &self.sink else {
            return;
        };
        let meta_suffix = meta
            .and_then(|m| if m.is_null() { None } else { Some(m) })
            .map(|m| format!(" {}", m))
            .unwrap_or_default();
        let line = format!(
            "[{}] {} [{}] {}{}",
            chrono::Utc::now().to_rfc3339(),
            level.label(),
            self.context,
            message,
            meta_suffix
        );
        file.write_line(&line);
    }

    pub fn error(&self, message: &str, meta: Option<&serde_json::Value>) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Option<&serde_json::Value>) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn info(&self, message: &str, meta: Option<&serde_json::Value>) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: Option<&serde_json::Value>) {
        self.log(LogLevel::Debug, message, meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_log(prefix: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}-{}.log", prefix, uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_sink_appends_context_and_meta() {
        let path = tmp_log("vantage-logger");
        let mut logger = Logger::with_file("vantage", &path).expect("open log file");
        logger.set_level(LogLevel::Debug);
        let child = logger.child("gateway");
        child.info("tool call", Some(&serde_json::json!({"tool": "list-tags"})));
        child.debug("second line", None);

        let text = std::fs::read_to_string(&path).expect("read log file");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO [vantage:gateway] tool call"));
        assert!(lines[0].contains(r#""tool":"list-tags""#));
        assert!(lines[1].contains("DEBUG"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn level_filter_drops_verbose_lines() {
        let path = tmp_log("vantage-logger-level");
        let mut logger = Logger::with_file("vantage", &path).expect("open log file");
        logger.set_level(LogLevel::Warn);
        logger.info("hidden", None);
        logger.warn("shown", None);

        let text = std::fs::read_to_string(&path).expect("read log file");
        assert!(!text.contains("hidden"));
        assert!(text.contains("shown"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unwritable_sink_reports_only_the_first_failure() {
        let path = tmp_log("vantage-logger-readonly");
        std::fs::write(&path, "").expect("create log file");
        let read_only = File::open(&path).expect("open read-only");
        let sink = Arc::new(FileSink::new(read_only));
        let logger = Logger {
            context: "vantage".to_string(),
            level: LogLevel::Debug,
            sink: LogSink::File(sink.clone()),
        };

        assert!(!sink.failed.load(Ordering::Relaxed));
        logger.info("lost line", None);
        assert!(sink.failed.load(Ordering::Relaxed));
        logger.info("also lost", None);
        assert!(!sink.report_failure("again"));
        assert_eq!(std::fs::read_to_string(&path).expect("read log file"), "");
        let _ = std::fs::remove_file(path);
    }
}
