use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the normalized club catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// AI suggestion service endpoint URL
    #[serde(default = "default_ai_api_url")]
    pub ai_api_url: String,

    /// AI suggestion service API key
    #[serde(default)]
    pub ai_api_key: String,

    /// Timeout for a single AI suggestion call, in seconds.
    /// A hung call is treated the same as an errored one.
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum requests per caller IP within the rate-limit window
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    /// Rate-limit window length in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Use `x-forwarded-for` as the rate-limit key. Enable only when the
    /// service sits behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_ai_api_url() -> String {
    "http://localhost:8089/v1/generate".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_rate_limit_max_requests() -> u32 {
    30
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
