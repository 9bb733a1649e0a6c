//! Civo provider configuration

use crate::config::ConfigError;
use civo_provider::{CivoOptions, ProviderData};
use confique::Config;
use url::Url;

/// Endpoints and restriction of the Civo provider.
///
/// Unset endpoints fall back to the public Civo ones.
#[derive(Debug, Config, Clone)]
pub struct ProviderConfig {
    /// Authorization endpoint
    #[config(env = "AUTH_PROVIDER_LOGIN_URL")]
    pub login_url: Option<String>,

    /// Token redemption endpoint
    #[config(env = "AUTH_PROVIDER_REDEEM_URL")]
    pub redeem_url: Option<String>,

    /// Profile endpoint returning the user's claims
    #[config(env = "AUTH_PROVIDER_PROFILE_URL")]
    pub profile_url: Option<String>,

    /// Endpoint used to check that an access token is still valid
    #[config(env = "AUTH_PROVIDER_VALIDATE_URL")]
    pub validate_url: Option<String>,

    /// OAuth scope (default: read)
    #[config(env = "AUTH_PROVIDER_SCOPE")]
    pub scope: Option<String>,

    /// Account whose permissions are checked
    #[config(env = "AUTH_PROVIDER_ACCOUNT")]
    pub account: Option<String>,

    /// Team the user must belong to, exclusive with the account options
    #[config(env = "AUTH_PROVIDER_TEAM")]
    pub team: Option<String>,

    /// Permission codes granting access to the account
    /// Comma-separated list (default: "")
    #[config(env = "AUTH_PROVIDER_PERMISSIONS", default = "")]
    pub permissions: String,

    /// Endpoint listing the user's permissions in an account
    #[config(env = "AUTH_PROVIDER_PERMISSIONS_URL")]
    pub permissions_url: Option<String>,
}

impl ProviderConfig {
    /// Get permission codes as a vector
    pub fn get_permissions(&self) -> Vec<String> {
        self.permissions
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn provider_data(&self) -> Result<ProviderData, ConfigError> {
        Ok(ProviderData {
            provider_name: String::new(),
            login_url: parse_url("login", self.login_url.as_deref())?,
            redeem_url: parse_url("redeem", self.redeem_url.as_deref())?,
            profile_url: parse_url("profile", self.profile_url.as_deref())?,
            validate_url: parse_url("validate", self.validate_url.as_deref())?,
            scope: self.scope.clone().unwrap_or_default(),
        })
    }

    pub fn civo_options(&self) -> CivoOptions {
        CivoOptions {
            account: self.account.clone(),
            team: self.team.clone(),
            permissions: self.get_permissions(),
            permissions_url: self.permissions_url.clone(),
        }
    }
}

fn parse_url(name: &'static str, value: Option<&str>) -> Result<Option<Url>, ConfigError> {
    match value.filter(|v| !v.is_empty()) {
        Some(raw) => Url::parse(raw)
            .map(Some)
            .map_err(|source| ConfigError::InvalidUrl {
                name,
                value: raw.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> ProviderConfig {
        ProviderConfig {
            login_url: None,
            redeem_url: None,
            profile_url: None,
            validate_url: None,
            scope: None,
            account: None,
            team: None,
            permissions: String::new(),
            permissions_url: None,
        }
    }

    #[test]
    fn test_get_permissions() {
        let config = ProviderConfig {
            permissions: "compute.read,kubernetes.admin".to_string(),
            ..empty_config()
        };
        assert_eq!(
            config.get_permissions(),
            vec!["compute.read", "kubernetes.admin"]
        );
    }

    #[test]
    fn test_get_permissions_with_spaces() {
        let config = ProviderConfig {
            permissions: " compute.read , , dns.write ".to_string(),
            ..empty_config()
        };
        assert_eq!(config.get_permissions(), vec!["compute.read", "dns.write"]);
    }

    #[test]
    fn test_get_permissions_empty() {
        assert!(empty_config().get_permissions().is_empty());
    }

    #[test]
    fn test_provider_data_unset_urls() {
        let data = empty_config().provider_data().unwrap();
        assert!(data.login_url.is_none());
        assert!(data.profile_url.is_none());
        assert!(data.validate_url.is_none());
        assert!(data.scope.is_empty());
    }

    #[test]
    fn test_provider_data_parses_urls() {
        let config = ProviderConfig {
            profile_url: Some("https://example.com/oauth/profile".to_string()),
            login_url: Some(String::new()),
            scope: Some("profile".to_string()),
            ..empty_config()
        };
        let data = config.provider_data().unwrap();
        assert_eq!(
            data.profile_url.unwrap().as_str(),
            "https://example.com/oauth/profile"
        );
        assert!(data.login_url.is_none());
        assert_eq!(data.scope, "profile");
    }

    #[test]
    fn test_provider_data_invalid_url() {
        let config = ProviderConfig {
            redeem_url: Some("not a url".to_string()),
            ..empty_config()
        };
        let err = config.provider_data().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "redeem", .. }));
    }

    #[test]
    fn test_civo_options() {
        let config = ProviderConfig {
            account: Some("acct-1".to_string()),
            permissions: "compute.read".to_string(),
            permissions_url: Some("https://api.civo.com/v2/permissions".to_string()),
            ..empty_config()
        };
        let options = config.civo_options();
        assert_eq!(options.account.as_deref(), Some("acct-1"));
        assert_eq!(options.permissions, vec!["compute.read"]);
        assert!(options.team.is_none());
    }
}
