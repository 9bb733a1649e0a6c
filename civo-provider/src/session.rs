use std::fmt;

/// Authentication session handed to the provider by the caller.
///
/// The provider only sets `email` and `user` and appends to `groups`; creating, storing
/// and expiring the session is left to the caller.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub access_token: String,
    pub email: String,
    pub user: String,
    pub groups: Vec<String>,
}

impl SessionState {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.access_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("SessionState")
            .field("access_token", &token)
            .field("email", &self.email)
            .field("user", &self.user)
            .field("groups", &self.groups)
            .finish()
    }
}
