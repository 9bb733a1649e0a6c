use crate::permissions::Permission;
use log::{debug, info, warn};

/// Outcome of the restriction check for one enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The user is allowed; `group` is appended to the session groups when present
    Allowed { group: Option<String> },
    Denied { reason: String },
}

/// Hook called at fixed points of the enrichment flow.
///
/// All methods default to no-ops so implementations only override what they record.
pub trait EnrichmentObserver: Send + Sync {
    fn profile_fetched(&self, _subject: &str) {}

    fn permissions_fetched(&self, _subject: &str, _account: &str, _permissions: &[Permission]) {}

    fn decision_made(&self, _subject: &str, _decision: &Decision) {}
}

/// Default observer writing through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl EnrichmentObserver for LogObserver {
    fn profile_fetched(&self, subject: &str) {
        debug!("Fetched profile for user {}", subject);
    }

    fn permissions_fetched(&self, subject: &str, account: &str, permissions: &[Permission]) {
        debug!(
            "Fetched {} permissions for user {} in account {}",
            permissions.len(),
            subject,
            account
        );
    }

    fn decision_made(&self, subject: &str, decision: &Decision) {
        match decision {
            Decision::Allowed { group: Some(group) } => {
                info!("User {} is allowed, granted group {}", subject, group)
            }
            Decision::Allowed { group: None } => info!("User {} is allowed", subject),
            Decision::Denied { reason } => warn!("User {} is denied: {}", subject, reason),
        }
    }
}
