//! # civo-provider
//!
//! Authorization enrichment for sessions authenticated against the Civo identity provider.
//!
//! ## Components
//!
//! - **Fetcher:** HTTP seam for authenticated GET requests, bounded by a [`RequestContext`].
//! - **Permissions:** The required permission set and the permission records returned by the API.
//! - **Restriction:** Team or account-permission restriction, selected once at construction.
//! - **Provider:** Resolves the profile, evaluates the restriction and enriches the session.

pub mod builder;
pub mod data;
pub mod error;
pub mod fetch;
pub mod observer;
pub mod permissions;
pub mod profile;
pub mod provider;
pub mod restriction;
pub mod session;

pub use builder::CivoProviderBuilder;
pub use data::{ProviderData, ProviderInfo};
pub use error::ProviderError;
pub use fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher, RequestContext};
pub use observer::{Decision, EnrichmentObserver, LogObserver};
pub use permissions::{Permission, PermissionSet};
pub use provider::CivoProvider;
pub use restriction::{CivoOptions, RestrictionMode};
pub use session::SessionState;
