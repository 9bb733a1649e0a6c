use crate::error::ProviderError;
use url::Url;

pub const CIVO_PROVIDER_NAME: &str = "civo";
pub const CIVO_DEFAULT_SCOPE: &str = "read";

const CIVO_DEFAULT_LOGIN_URL: &str = "https://auth.civo.com/authorize";
const CIVO_DEFAULT_REDEEM_URL: &str = "https://auth.civo.com/token";
const CIVO_DEFAULT_PROFILE_URL: &str = "https://auth.civo.com/userinfo";

/// Endpoint and scope overrides supplied by the caller.
///
/// Any field left unset (or an empty name/scope) falls back to the Civo default.
#[derive(Debug, Clone, Default)]
pub struct ProviderData {
    pub provider_name: String,
    pub login_url: Option<Url>,
    pub redeem_url: Option<Url>,
    pub profile_url: Option<Url>,
    pub validate_url: Option<Url>,
    pub scope: String,
}

/// Provider endpoints and scope after defaults have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub provider_name: String,
    pub login_url: Url,
    pub redeem_url: Url,
    pub profile_url: Url,
    pub validate_url: Url,
    pub scope: String,
}

impl ProviderData {
    pub(crate) fn resolve(self) -> Result<ProviderInfo, ProviderError> {
        Ok(ProviderInfo {
            provider_name: non_empty_or(self.provider_name, CIVO_PROVIDER_NAME),
            login_url: url_or_default(self.login_url, CIVO_DEFAULT_LOGIN_URL)?,
            redeem_url: url_or_default(self.redeem_url, CIVO_DEFAULT_REDEEM_URL)?,
            profile_url: url_or_default(self.profile_url, CIVO_DEFAULT_PROFILE_URL)?,
            validate_url: url_or_default(self.validate_url, CIVO_DEFAULT_PROFILE_URL)?,
            scope: non_empty_or(self.scope, CIVO_DEFAULT_SCOPE),
        })
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn url_or_default(url: Option<Url>, default: &str) -> Result<Url, ProviderError> {
    match url {
        Some(url) => Ok(url),
        None => Url::parse(default)
            .map_err(|e| ProviderError::Config(format!("invalid default URL {default}: {e}"))),
    }
}
