const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Connection settings for one logical inference server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    /// Print request/stream debug output to the console
    pub verbose: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            verbose: false,
        }
    }

    /// Read settings from `TERNCHAT_API_URL`, `TERNCHAT_API_KEY` and
    /// `TERNCHAT_VERBOSE`, falling back to a local server with no key.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("TERNCHAT_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("TERNCHAT_API_KEY").unwrap_or_default(),
            verbose: std::env::var("TERNCHAT_VERBOSE").map(|v| v == "1").unwrap_or(false),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
