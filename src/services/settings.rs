use crate::constants::{env as env_keys, upstream};
use std::fmt;
use std::path::PathBuf;

/// Process configuration, read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct Settings {
    pub bearer_token: String,
    pub api_host: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn new(bearer_token: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            api_host: api_host.into(),
            log_file: None,
        }
    }

    pub fn from_env() -> Self {
        let bearer_token = std::env::var(env_keys::BEARER_TOKEN)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        let api_host = std::env::var(env_keys::API_HOST)
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| upstream::DEFAULT_HOST.to_string());
        let log_file = std::env::var(env_keys::LOG_FILE)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            bearer_token,
            api_host,
            log_file,
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.bearer_token.is_empty()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bearer_token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Settings")
            .field("bearer_token", &token)
            .field("api_host", &self.api_host)
            .field("log_file", &self.log_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_the_token() {
        let settings = Settings::new("tok-secret", "https://api.vantage.sh");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("tok-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn empty_token_means_no_credential() {
        assert!(!Settings::new("", "https://api.vantage.sh").has_credential());
        assert!(Settings::new("tok", "https://api.vantage.sh").has_credential());
    }
}
