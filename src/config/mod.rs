use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8001").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Redis connection string for the hot result store
    pub redis_url: String,

    /// Generation engine webhook endpoint. Only the client side submits
    /// jobs, so the relay binary runs without it.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// HMAC secret for session tokens
    pub jwt_secret: String,

    /// Address granted allowlist administration rights
    pub admin_email: String,

    /// Engine connect timeout, seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Synchronous generation read timeout, seconds. Generation runs for
    /// minutes, so this is deliberately long.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Async submission acknowledgement timeout, seconds
    #[serde(default = "default_ack_timeout_secs")]
    pub ack_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    60
}

fn default_read_timeout_secs() -> u64 {
    600
}

fn default_ack_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
