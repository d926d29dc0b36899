use crate::sources::error::SourceError;
use bon::Builder;
use std::fmt;
use std::time::Duration;

pub const NAVER_BASE_URL: &str = "https://openapi.naver.com";
pub const OPEN_METEO_BASE_URL: &str = "https://archive-api.open-meteo.com";

pub const NAVER_CLIENT_ID_VAR: &str = "NAVER_CLIENT_ID";
pub const NAVER_CLIENT_SECRET_VAR: &str = "NAVER_CLIENT_SECRET";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Application credentials for the Naver DataLab API.
#[derive(Clone, PartialEq, Eq)]
pub struct NaverCredentials {
    client_id: String,
    client_secret: String,
}

impl NaverCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads `NAVER_CLIENT_ID` and `NAVER_CLIENT_SECRET` from the process
    /// environment. Empty values count as missing.
    pub fn from_env() -> Result<Self, SourceError> {
        let read = |var: &'static str| {
            std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SourceError::MissingCredentials(var))
        };
        Ok(Self::new(
            read(NAVER_CLIENT_ID_VAR)?,
            read(NAVER_CLIENT_SECRET_VAR)?,
        ))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Connection settings for both series fetchers, passed once at construction.
///
/// ```
/// use trendwx::{NaverCredentials, SourceConfig};
/// use std::time::Duration;
///
/// let config = SourceConfig::builder()
///     .credentials(NaverCredentials::new("id", "secret"))
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.timezone, "Asia/Seoul");
/// assert_eq!(config.max_concurrent_fetches, 4);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SourceConfig {
    pub credentials: NaverCredentials,
    #[builder(into, default = NAVER_BASE_URL.to_string())]
    pub naver_base_url: String,
    #[builder(into, default = OPEN_METEO_BASE_URL.to_string())]
    pub open_meteo_base_url: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    pub timezone: String,
    #[builder(default = DEFAULT_MAX_CONCURRENT_FETCHES)]
    pub max_concurrent_fetches: usize,
    #[builder(default = DEFAULT_CACHE_TTL)]
    pub cache_ttl: Duration,
}

impl SourceConfig {
    /// Default settings with credentials taken from the environment.
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self::builder()
            .credentials(NaverCredentials::from_env()?)
            .build())
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, SourceError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(SourceError::ClientBuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::builder()
            .credentials(NaverCredentials::new("id", "secret"))
            .build();
        assert_eq!(config.naver_base_url, NAVER_BASE_URL);
        assert_eq!(config.open_meteo_base_url, OPEN_METEO_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = NaverCredentials::new("my-id", "hunter2");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("my-id"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_missing_credentials_names_variable() {
        let err = SourceError::MissingCredentials(NAVER_CLIENT_SECRET_VAR);
        assert!(err.to_string().contains("NAVER_CLIENT_SECRET"));
        assert!(err.is_credential_problem());
    }
}
