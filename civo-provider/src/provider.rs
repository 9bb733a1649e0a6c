use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use url::Url;

use crate::builder::CivoProviderBuilder;
use crate::data::ProviderInfo;
use crate::error::ProviderError;
use crate::fetch::{FetchError, Fetcher, RequestContext, fetch, oidc_header};
use crate::observer::{Decision, EnrichmentObserver};
use crate::permissions::{Permission, permissions_endpoint};
use crate::profile::Profile;
use crate::restriction::{CivoOptions, RestrictionMode};
use crate::session::SessionState;

/// Civo identity provider.
///
/// Holds immutable configuration only, so one instance can serve concurrent requests
/// behind an `Arc`.
pub struct CivoProvider {
    info: ProviderInfo,
    restriction: RestrictionMode,
    fetcher: Arc<dyn Fetcher>,
    observer: Arc<dyn EnrichmentObserver>,
}

impl CivoProvider {
    pub fn builder(options: CivoOptions) -> CivoProviderBuilder {
        CivoProviderBuilder::new(options)
    }

    pub(crate) fn new(
        info: ProviderInfo,
        restriction: RestrictionMode,
        fetcher: Arc<dyn Fetcher>,
        observer: Arc<dyn EnrichmentObserver>,
    ) -> Self {
        Self {
            info,
            restriction,
            fetcher,
            observer,
        }
    }

    pub fn name(&self) -> &str {
        &self.info.provider_name
    }

    pub fn data(&self) -> &ProviderInfo {
        &self.info
    }

    pub fn restriction(&self) -> &RestrictionMode {
        &self.restriction
    }

    /// Returns the email address from the user's profile
    pub async fn get_email_address(
        &self,
        ctx: &RequestContext,
        session: &SessionState,
    ) -> Result<String, ProviderError> {
        require_token(&session.access_token)?;

        let profile = self.fetch_profile(ctx, &session.access_token).await?;
        Ok(profile.email()?.to_string())
    }

    /// Fetches the profile and checks its team claim against the configured team.
    ///
    /// Returns the matching team id.
    pub async fn check_identity(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<String, ProviderError> {
        require_token(access_token)?;
        let RestrictionMode::Identity { team } = &self.restriction else {
            return Err(ProviderError::Config(
                "identity restriction is not configured".to_string(),
            ));
        };

        let profile = self.fetch_profile(ctx, access_token).await?;
        match_identity(team, &profile)
    }

    /// Returns the permissions the user holds in the configured account.
    ///
    /// The result is the sum of the permissions of all the user's team memberships in that
    /// account, and may be empty.
    pub async fn check_permissions(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<Vec<Permission>, ProviderError> {
        require_token(access_token)?;
        let RestrictionMode::Permissions { account, url, .. } = &self.restriction else {
            return Err(ProviderError::Config(
                "permission restriction is not configured".to_string(),
            ));
        };

        self.fetch_permissions(ctx, access_token, account, url)
            .await
    }

    /// Returns true if any of `permissions` is one of the required permissions
    pub fn is_allowed(&self, permissions: &[Permission]) -> bool {
        match &self.restriction {
            RestrictionMode::Permissions { required, .. } => required.matches_any(permissions),
            _ => false,
        }
    }

    /// Resolves the user from the profile, applies the configured restriction and, when
    /// the user is allowed, writes email, user and group into the session.
    ///
    /// The session is only written once the user is allowed; on any error it is left as
    /// it was.
    pub async fn enrich_session(
        &self,
        ctx: &RequestContext,
        session: &mut SessionState,
    ) -> Result<(), ProviderError> {
        require_token(&session.access_token)?;

        debug!("Enriching session from {}", self.info.profile_url);
        let profile = self.fetch_profile(ctx, &session.access_token).await?;
        let email = profile.email()?.to_string();
        let user = profile.user_id()?.to_string();
        self.observer.profile_fetched(&user);

        let outcome = self
            .evaluate(ctx, &session.access_token, &profile, &user)
            .await;
        match &outcome {
            Ok(group) => self.observer.decision_made(
                &user,
                &Decision::Allowed {
                    group: group.clone(),
                },
            ),
            Err(ProviderError::AccessDenied(reason)) => self.observer.decision_made(
                &user,
                &Decision::Denied {
                    reason: reason.clone(),
                },
            ),
            Err(_) => {}
        }
        let group = outcome?;

        session.email = email;
        session.user = user;
        session.groups.extend(group);
        Ok(())
    }

    /// Checks the access token against the validate URL.
    ///
    /// Any failure, including an empty token, results in `false`.
    pub async fn validate_session(&self, ctx: &RequestContext, session: &SessionState) -> bool {
        if session.access_token.is_empty() {
            debug!("Skipping token validation, session has no access token");
            return false;
        }

        let headers = match oidc_header(&session.access_token) {
            Ok(headers) => headers,
            Err(e) => {
                warn!("Token validation failed: {}", e);
                return false;
            }
        };

        match fetch(self.fetcher.as_ref(), ctx, &self.info.validate_url, headers).await {
            Ok(response) if response.status.is_success() => true,
            Ok(response) => {
                debug!("Token validation returned status {}", response.status);
                false
            }
            Err(e) => {
                warn!("Token validation request failed: {}", e);
                false
            }
        }
    }

    /// Applies the restriction mode, returning the group to grant on success
    async fn evaluate(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        profile: &Profile,
        subject: &str,
    ) -> Result<Option<String>, ProviderError> {
        match &self.restriction {
            RestrictionMode::None => Ok(None),
            RestrictionMode::Identity { team } => match_identity(team, profile).map(Some),
            RestrictionMode::Permissions {
                account,
                required,
                url,
            } => {
                let permissions = self
                    .fetch_permissions(ctx, access_token, account, url)
                    .await?;
                self.observer
                    .permissions_fetched(subject, account, &permissions);

                if required.matches_any(&permissions) {
                    Ok(Some(account.clone()))
                } else {
                    Err(ProviderError::AccessDenied(format!(
                        "user {subject} in account {account} has no sufficient permissions"
                    )))
                }
            }
        }
    }

    async fn fetch_profile(
        &self,
        ctx: &RequestContext,
        access_token: &str,
    ) -> Result<Profile, ProviderError> {
        let body = self
            .get(ctx, &self.info.profile_url, access_token)
            .await?;
        Profile::parse(&body)
    }

    async fn fetch_permissions(
        &self,
        ctx: &RequestContext,
        access_token: &str,
        account: &str,
        url: &Url,
    ) -> Result<Vec<Permission>, ProviderError> {
        let endpoint = permissions_endpoint(url, account);
        debug!("Fetching permissions from {}", endpoint);

        let body = self.get(ctx, &endpoint, access_token).await?;
        serde_json::from_slice(&body).map_err(|e| {
            ProviderError::MalformedResponse(format!("failed to parse permissions response: {e}"))
        })
    }

    /// Authenticated GET returning the body of a successful response
    async fn get(
        &self,
        ctx: &RequestContext,
        url: &Url,
        access_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let headers = oidc_header(access_token)?;
        let response = fetch(self.fetcher.as_ref(), ctx, url, headers).await?;

        if !response.status.is_success() {
            return Err(FetchError::InvalidStatus(response.status).into());
        }
        Ok(response.body)
    }
}

impl fmt::Debug for CivoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CivoProvider")
            .field("info", &self.info)
            .field("restriction", &self.restriction.name())
            .finish_non_exhaustive()
    }
}

fn require_token(access_token: &str) -> Result<(), ProviderError> {
    if access_token.is_empty() {
        return Err(ProviderError::MissingCredential);
    }
    Ok(())
}

fn match_identity(team: &str, profile: &Profile) -> Result<String, ProviderError> {
    let claimed = profile.team_id()?;
    if claimed != team {
        return Err(ProviderError::AccessDenied(format!(
            "team {claimed} is not allowed"
        )));
    }
    Ok(claimed.to_string())
}
