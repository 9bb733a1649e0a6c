pub(crate) use crate::config::provider::ProviderConfig;
use civo_provider::ProviderError;
use confique::Config;
use thiserror::Error;

pub mod provider;

/// Errors raised while loading the configuration or building the provider from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confique::Error),
    #[error("invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("invalid provider configuration: {0}")]
    Provider(#[from] ProviderError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Main configuration structure for the auth server
#[derive(Debug, Config, Clone)]
pub struct ServerConfig {
    /// The port the auth server will listen to (default: 4180)
    #[config(env = "AUTH_PORT", default = 4180)]
    pub port: u16,

    /// Timeout in seconds for each request to the identity provider, 0 for none (default: 5)
    #[config(env = "AUTH_REQUEST_TIMEOUT", default = 5)]
    pub request_timeout: u64,

    /// Civo provider configuration
    #[config(nested)]
    pub provider: ProviderConfig,
}

impl ServerConfig {
    /// Creates a new configuration from environment variables
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::builder().env().load()?)
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(provider_mock: &wiremock::MockServer) -> Self {
        let uri = provider_mock.uri();
        Self {
            port: 0, // Let the OS choose a port
            request_timeout: 5,
            provider: ProviderConfig {
                login_url: None,
                redeem_url: None,
                profile_url: Some(format!("{uri}/oauth/profile")),
                validate_url: Some(format!("{uri}/oauth/tokeninfo")),
                scope: None,
                account: Some("acct-1".to_string()),
                team: None,
                permissions: "compute.read".to_string(),
                permissions_url: Some(format!("{uri}/v2/permissions")),
            },
        }
    }
}
