use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub access_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            access_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("WECURE_API_URL")
                .unwrap_or_else(|_| {
                    warn!("WECURE_API_URL not set, using default");
                    DEFAULT_API_BASE_URL.to_string()
                }),
            request_timeout: Duration::from_secs(Self::timeout_secs_from_env()),
            access_token: env::var("WECURE_ACCESS_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        };

        if !config.is_configured() {
            warn!("No access token configured - only public endpoints will succeed");
        }

        config
    }

    fn timeout_secs_from_env() -> u64 {
        parse_timeout_secs(env::var("WECURE_REQUEST_TIMEOUT_SECS").ok().as_deref())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
            && self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Joins an API path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Timeout in seconds from its raw env value; missing, unparseable and zero
/// values fall back to the default.
fn parse_timeout_secs(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return DEFAULT_REQUEST_TIMEOUT_SECS;
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!("WECURE_REQUEST_TIMEOUT_SECS is 0, using default");
            DEFAULT_REQUEST_TIMEOUT_SECS
        }
        Ok(secs) => secs,
        Err(_) => {
            warn!("WECURE_REQUEST_TIMEOUT_SECS is not a number ({}), using default", raw);
            DEFAULT_REQUEST_TIMEOUT_SECS
        }
    }
}
