use crate::error::ProviderError;
use serde_json::{Map, Value};

pub const EMAIL_CLAIM: &str = "email";
pub const USER_ID_CLAIM: &str = "user_id";
pub const TEAM_ID_CLAIM: &str = "team_id";

/// Claims returned by the profile endpoint, parsed once per request
#[derive(Debug, Clone, PartialEq)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn parse(body: &[u8]) -> Result<Self, ProviderError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(claims)) => Ok(Self(claims)),
            Ok(_) => Err(ProviderError::MalformedResponse(
                "profile response is not a JSON object".to_string(),
            )),
            Err(e) => Err(ProviderError::MalformedResponse(format!(
                "failed to parse profile response: {e}"
            ))),
        }
    }

    /// Returns a string claim; a missing or non-string claim is a malformed response.
    pub fn claim(&self, name: &str) -> Result<&str, ProviderError> {
        match self.0.get(name) {
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(ProviderError::MalformedResponse(format!(
                "profile claim '{name}' is not a string"
            ))),
            None => Err(ProviderError::MalformedResponse(format!(
                "profile claim '{name}' is missing"
            ))),
        }
    }

    pub fn email(&self) -> Result<&str, ProviderError> {
        self.claim(EMAIL_CLAIM)
    }

    pub fn user_id(&self) -> Result<&str, ProviderError> {
        self.claim(USER_ID_CLAIM)
    }

    pub fn team_id(&self) -> Result<&str, ProviderError> {
        self.claim(TEAM_ID_CLAIM)
    }
}
