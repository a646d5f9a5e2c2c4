use std::time::Duration;

/// Where the backend listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// How many days ahead the dashboard asks the forecaster for.
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

const DEFAULT_USER_AGENT: &str = concat!("indexdash/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`IndexClient`].
///
/// No timeout is applied unless one is set; a hung backend then hangs the request.
///
/// [`IndexClient`]: crate::client::IndexClient
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_identify_the_crate() {
        let config = ClientConfig::new("http://backend:8000");
        assert_eq!(config.base_url, "http://backend:8000");
        assert!(config.user_agent.starts_with("indexdash/"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn user_agent_can_be_overridden() {
        let config = ClientConfig::default()
            .with_user_agent("desk-01 ops@example.com")
            .with_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "desk-01 ops@example.com");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
