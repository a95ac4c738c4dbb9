use campground_scan::{RateLimit, ScanError, SearchConfig};

/// Server configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Optional RIDB API key
    pub api_key: Option<String>,
    /// Configuration applied to every search
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RateLimit::default();
        let min_secs = parse_secs(&lookup, "RATE_LIMIT_MIN_SECS", defaults.min_secs)?;
        let max_secs = parse_secs(&lookup, "RATE_LIMIT_MAX_SECS", defaults.max_secs)?;

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            api_key: lookup("RECREATION_GOV_API_KEY").filter(|key| !key.is_empty()),
            search: SearchConfig {
                rate_limit: RateLimit::new(min_secs, max_secs)?,
            },
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ScanError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ScanError::ConfigError(format!("{} must be a number: {}", key, e))),
        None => Ok(default),
    }
}
