use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Firebase project hosting the Firestore database
    pub firebase_project_id: String,

    /// Web API key used on every Firestore REST call
    pub firebase_api_key: String,

    /// Firestore REST base URL
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    /// Firestore database id within the project
    #[serde(default = "default_firestore_database")]
    pub firestore_database: String,

    /// Documents requested per list call while walking a collection
    #[serde(default = "default_firestore_page_size")]
    pub firestore_page_size: u32,

    /// Upper bound for a single store request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_firestore_database() -> String {
    "(default)".to_string()
}

fn default_firestore_page_size() -> u32 {
    300
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
