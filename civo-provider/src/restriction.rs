use crate::error::ProviderError;
use crate::permissions::PermissionSet;
use log::warn;
use url::Url;

/// Restriction options recognised by the Civo provider
#[derive(Debug, Clone, Default)]
pub struct CivoOptions {
    /// Account whose permissions are checked
    pub account: Option<String>,
    /// Team the user must belong to
    pub team: Option<String>,
    /// Permission codes, any one of which grants access to the account
    pub permissions: Vec<String>,
    /// Endpoint listing the user's permissions in an account
    pub permissions_url: Option<String>,
}

/// How an authenticated user is turned into an authorized one.
///
/// Exactly one mode is active per provider; it is chosen once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestrictionMode {
    /// Every authenticated user is allowed
    None,
    /// The profile's `team_id` claim must equal `team`
    Identity { team: String },
    /// The user must hold at least one of `required` in `account`
    Permissions {
        account: String,
        required: PermissionSet,
        url: Url,
    },
}

impl RestrictionMode {
    pub fn from_options(options: &CivoOptions) -> Result<Self, ProviderError> {
        let account = non_empty(options.account.as_deref());
        let team = non_empty(options.team.as_deref());
        let permissions_url = non_empty(options.permissions_url.as_deref());
        let wants_permissions =
            account.is_some() || permissions_url.is_some() || !options.permissions.is_empty();

        match (team, wants_permissions) {
            (Some(_), true) => Err(ProviderError::Config(
                "team restriction cannot be combined with account permissions".to_string(),
            )),
            (Some(team), false) => Ok(Self::Identity {
                team: team.to_string(),
            }),
            (None, false) => Ok(Self::None),
            (None, true) => {
                let account = account.ok_or_else(|| {
                    ProviderError::Config("permission restriction requires an account".to_string())
                })?;
                let raw_url = permissions_url.ok_or_else(|| {
                    ProviderError::Config(
                        "permission restriction requires a permissions URL".to_string(),
                    )
                })?;
                let url = Url::parse(raw_url).map_err(|e| {
                    ProviderError::Config(format!("invalid permissions URL {raw_url}: {e}"))
                })?;

                let required: PermissionSet = options.permissions.iter().cloned().collect();
                if required.is_empty() {
                    warn!(
                        "No permissions configured for account {}, every user will be denied",
                        account
                    );
                }

                Ok(Self::Permissions {
                    account: account.to_string(),
                    required,
                    url,
                })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Identity { .. } => "identity",
            Self::Permissions { .. } => "permissions",
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
