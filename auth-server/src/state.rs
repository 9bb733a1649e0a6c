use crate::config::{ConfigError, ServerConfig};
use civo_provider::{CivoProvider, HttpFetcher, RequestContext};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub provider: Arc<CivoProvider>,
    /// Cancelled on shutdown; every request context is a child of it
    pub shutdown: CancellationToken,
}

impl AppState {
    fn create_provider_client() -> Result<Client, reqwest::Error> {
        Client::builder()
            .connect_timeout(Duration::from_secs(2))
            // Configure connection pool
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
    }

    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(Self::create_provider_client()?);
        let provider = CivoProvider::builder(config.provider.civo_options())
            .with_provider_data(config.provider.provider_data()?)
            .with_fetcher(Arc::new(fetcher))
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            shutdown: CancellationToken::new(),
        })
    }

    #[cfg(test)]
    pub fn for_testing(config: &ServerConfig) -> Self {
        Self::new(config.clone()).expect("Failed to create test state")
    }

    /// Context bounding the provider calls made for one incoming request.
    ///
    /// A `request_timeout` of 0 disables the deadline.
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new(self.shutdown.child_token());
        match self.config.request_timeout {
            0 => ctx,
            secs => ctx.with_timeout(Duration::from_secs(secs)),
        }
    }
}
