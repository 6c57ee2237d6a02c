use vantage_mcp::app::App;
use vantage_mcp::constants::upstream::DEFAULT_HOST;
use vantage_mcp::services::settings::Settings;

mod common;
use common::ENV_LOCK;

const KEYS: [&str; 3] = [
    "VANTAGE_BEARER_TOKEN",
    "VANTAGE_API_HOST",
    "VANTAGE_MCP_LOG_FILE",
];

fn snapshot() -> Vec<(&'static str, Option<String>)> {
    KEYS.iter().map(|k| (*k, std::env::var(k).ok())).collect()
}

fn restore(saved: Vec<(&'static str, Option<String>)>) {
    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
}

#[tokio::test]
async fn defaults_apply_when_env_is_empty() {
    let _guard = ENV_LOCK.lock().await;
    let saved = snapshot();
    for key in KEYS {
        std::env::remove_var(key);
    }

    let settings = Settings::from_env();
    assert_eq!(settings.bearer_token, "");
    assert_eq!(settings.api_host, DEFAULT_HOST);
    assert!(settings.log_file.is_none());
    assert!(!settings.has_credential());

    restore(saved);
}

#[tokio::test]
async fn env_values_are_trimmed() {
    let _guard = ENV_LOCK.lock().await;
    let saved = snapshot();
    std::env::set_var("VANTAGE_BEARER_TOKEN", "  tok-ro \n");
    std::env::set_var("VANTAGE_API_HOST", "http://127.0.0.1:4010/");
    std::env::set_var("VANTAGE_MCP_LOG_FILE", "  ");

    let settings = Settings::from_env();
    assert_eq!(settings.bearer_token, "tok-ro");
    assert_eq!(settings.api_host, "http://127.0.0.1:4010");
    assert!(settings.log_file.is_none());
    assert!(!format!("{:?}", settings).contains("tok-ro"));

    restore(saved);
}

#[tokio::test]
async fn log_file_receives_startup_lines() {
    let _guard = ENV_LOCK.lock().await;
    let path = std::env::temp_dir().join(format!("vantage-mcp-{}.log", uuid::Uuid::new_v4()));
    let settings = Settings::new("", "http://127.0.0.1:9").with_log_file(&path);

    let app = App::initialize(settings).await.expect("startup");
    assert!(app.gateway.credential().is_err());

    let contents = std::fs::read_to_string(&path).expect("log file");
    assert!(contents.contains("Bearer token rejected"));
    assert!(!contents.contains("Authorization"));
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn unwritable_log_path_fails_startup() {
    let _guard = ENV_LOCK.lock().await;
    let path = std::env::temp_dir()
        .join(format!("missing-{}", uuid::Uuid::new_v4()))
        .join("server.log");
    let settings = Settings::new("", DEFAULT_HOST).with_log_file(path);
    assert!(App::initialize(settings).await.is_err());
}
