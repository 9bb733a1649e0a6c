use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Query parameter carrying the account the permissions are requested for
pub const ACCOUNT_QUERY_PARAM: &str = "account_id";

/// A permission granted to the user, as returned by the permissions endpoint.
///
/// Only `code` takes part in access decisions; `name` and `description` are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The permission codes a user needs at least one of.
///
/// Built once from configuration; duplicates collapse and an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any of the user's permissions is part of this set
    pub fn matches_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.contains(&p.code))
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Adds `account_id=<account>` to the permissions URL.
///
/// The parameter is joined with `?` when the URL has no query yet and with `&` otherwise;
/// trailing `&` separators of the configured query are dropped first. The account value
/// is form-encoded.
pub fn permissions_endpoint(permissions_url: &Url, account: &str) -> Url {
    let mut endpoint = permissions_url.clone();
    if let Some(query) = permissions_url.query() {
        endpoint.set_query(Some(query.trim_end_matches('&')));
    }
    endpoint
        .query_pairs_mut()
        .append_pair(ACCOUNT_QUERY_PARAM, account);
    endpoint
}
