use crate::fetch::FetchError;
use thiserror::Error;

/// Errors returned by the provider operations.
///
/// None of them are retried inside the provider. Messages name the subject or account
/// involved but never the access token or the configured permission set.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("missing access token")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(#[from] FetchError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("configuration error: {0}")]
    Config(String),
}
