pub mod server {
    pub const NAME: &str = "vantage-mcp-server";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const HTTP_BIND: &str = "127.0.0.1:8787";
    pub const HTTP_PATH: &str = "/mcp";
}

pub mod env {
    pub const BEARER_TOKEN: &str = "VANTAGE_BEARER_TOKEN";
    pub const API_HOST: &str = "VANTAGE_API_HOST";
    pub const LOG_FILE: &str = "VANTAGE_MCP_LOG_FILE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod upstream {
    pub const DEFAULT_HOST: &str = "https://api.vantage.sh";
    pub const API_VERSION: &str = "v2";
    pub const READ_SCOPE: &str = "read";
    pub const TOKEN_SETTINGS_URL: &str = "https://console.vantage.sh/settings/access_tokens";
}

pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const TIMEOUT_CONNECTION_MS: u64 = 5_000;
}

/// Fixed page sizes per upstream resource. Not exposed to callers.
pub mod limits {
    pub const DEFAULT: u32 = 128;
    pub const COST_ITEMS: u32 = 64;
    pub const COST_QUERY: u32 = 1_000;
    pub const FORECAST: u32 = 2_000;
    pub const COST_SERVICES: u32 = 2_000;
    pub const DASHBOARDS: u32 = 64;
    pub const UNIT_COSTS: u32 = 64;
}

pub mod resources {
    pub const PROVIDERS_URI: &str = "vntg://providers";
    pub const VERSION_URI: &str = "vntg://version";
    pub const PROVIDERS: &[&str] = &["aws", "azure", "gcp"];
    pub const GUIDE_URI_PREFIX: &str = "file://vantage/";
}
