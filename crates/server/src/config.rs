//! Server configuration

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_RATE_LIMIT_RPS: u32 = 100;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;
const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Enables `X-API-Key` authentication on `/api` when set
    pub api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    /// Enables the Claude text generator when set
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,
    /// Idle seconds after which a session's latest assessment is dropped
    pub session_ttl_secs: u64,
    /// Most sessions tracked at once; the least recently used is dropped
    pub session_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            bind_address: non_empty("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            api_key: non_empty("API_KEY"),
            cors_origins: non_empty("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
            rate_limit_rps: non_empty("RATE_LIMIT_RPS")
                .and_then(|rps| rps.trim().parse().ok())
                .filter(|rps| *rps > 0)
                .unwrap_or(DEFAULT_RATE_LIMIT_RPS),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            anthropic_model: non_empty("ANTHROPIC_MODEL"),
            session_ttl_secs: non_empty("SESSION_TTL_SECS")
                .and_then(|secs| secs.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            session_capacity: non_empty("SESSION_CAPACITY")
                .and_then(|cap| cap.trim().parse().ok())
                .filter(|cap| *cap > 0)
                .unwrap_or(DEFAULT_SESSION_CAPACITY),
        }
    }
}
