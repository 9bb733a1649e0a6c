use std::sync::Arc;

use crate::data::ProviderData;
use crate::error::ProviderError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::observer::{EnrichmentObserver, LogObserver};
use crate::provider::CivoProvider;
use crate::restriction::{CivoOptions, RestrictionMode};

/// A builder for configuring a [`CivoProvider`].
///
/// Endpoints default to the public Civo ones, the fetcher to a plain `reqwest` client and
/// the observer to [`LogObserver`].
pub struct CivoProviderBuilder {
    data: ProviderData,
    options: CivoOptions,
    fetcher: Option<Arc<dyn Fetcher>>,
    observer: Option<Arc<dyn EnrichmentObserver>>,
}

impl CivoProviderBuilder {
    pub fn new(options: CivoOptions) -> Self {
        Self {
            data: ProviderData::default(),
            options,
            fetcher: None,
            observer: None,
        }
    }

    /// Overrides the provider endpoints and scope.
    pub fn with_provider_data(mut self, data: ProviderData) -> Self {
        self.data = data;
        self
    }

    /// Sets the HTTP seam used for profile, permission and validation requests.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn EnrichmentObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Applies defaults, builds the restriction mode and returns the provider.
    pub fn build(self) -> Result<CivoProvider, ProviderError> {
        let info = self.data.resolve()?;
        let restriction = RestrictionMode::from_options(&self.options)?;
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::default()),
        };
        let observer: Arc<dyn EnrichmentObserver> = match self.observer {
            Some(observer) => observer,
            None => Arc::new(LogObserver),
        };

        Ok(CivoProvider::new(info, restriction, fetcher, observer))
    }
}
