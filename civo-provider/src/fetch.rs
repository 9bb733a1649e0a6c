use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, InvalidHeaderValue};
use http::{HeaderMap, HeaderValue, StatusCode};
use log::debug;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Errors that can occur while talking to the identity provider
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build request headers: {0}")]
    BuildError(#[from] InvalidHeaderValue),
    #[error("failed to send request: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("request failed with status: {0}")]
    InvalidStatus(StatusCode),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
}

/// Raw response of an outbound GET request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues authenticated GET requests on behalf of the provider.
///
/// Retry and TLS policy belong to the implementation; the provider only bounds each
/// call with the caller's [`RequestContext`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<FetchResponse, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url.clone()).headers(headers).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}

/// Cancellation and deadline for the remote calls of one provider operation
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            timeout: None,
        }
    }

    /// Bounds every remote call made with this context by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builds the headers sent with every provider request: a bearer authorization header
/// and a JSON accept header.
pub(crate) fn oidc_header(access_token: &str) -> Result<HeaderMap, FetchError> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Sends a GET through `fetcher`, racing it against the context's cancellation token and
/// deadline.
pub(crate) async fn fetch(
    fetcher: &dyn Fetcher,
    ctx: &RequestContext,
    url: &Url,
    headers: HeaderMap,
) -> Result<FetchResponse, FetchError> {
    debug!("Sending GET request to {}", url);

    let request = fetcher.get(url, headers);
    let bounded = async {
        match ctx.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => request.await,
        }
    };

    tokio::select! {
        biased;
        _ = ctx.cancellation.cancelled() => Err(FetchError::Cancelled),
        result = bounded => result,
    }
}
