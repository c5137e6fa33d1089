use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Stand-in identity until the backend grows authentication.
pub const DEFAULT_USER_ID: &str = "user_123";

/// Validated settings for talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: api_url.to_string(),
            reason,
        };

        let base_url = Url::parse(api_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join an absolute API path (e.g. `/chat/message`) onto the base URL,
    /// keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Identity of whoever drives the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: String,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Result<Self, ConfigError> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(ConfigError::EmptyUserId);
        }
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = ClientConfig::new("http://127.0.0.1:8000/", 5).unwrap();
        assert_eq!(
            cfg.endpoint("/chat/message").as_str(),
            "http://127.0.0.1:8000/chat/message"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let cfg = ClientConfig::new("https://example.com/api", 5).unwrap();
        assert_eq!(
            cfg.endpoint("/user/save").as_str(),
            "https://example.com/api/user/save"
        );
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeout() {
        assert!(matches!(
            ClientConfig::new("not a url", 5),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com", 5),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert_eq!(
            ClientConfig::new(DEFAULT_API_URL, 0),
            Err(ConfigError::ZeroTimeout)
        );
    }

    #[test]
    fn default_points_at_loopback() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url().as_str(), "http://127.0.0.1:8000/");
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn session_context_rejects_blank_user() {
        assert_eq!(SessionContext::new("  "), Err(ConfigError::EmptyUserId));
        assert_eq!(SessionContext::new("u-7").unwrap().user_id(), "u-7");
        assert_eq!(SessionContext::default().user_id(), DEFAULT_USER_ID);
    }
}
