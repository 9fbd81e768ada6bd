//! Collaborators that talk to the outside world. The finder only sees these
//! traits; HTTP implementations live in the server crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::hints::ReferenceInfo;
use crate::profile::{Platform, PlatformProfile};
use crate::scorer_trait::SecondaryLookups;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// An account a platform reported for a candidate pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAccount {
    pub handle: String,
    /// True when the platform confirmed the account exists; false for a
    /// direct-lookup guess that may still 404.
    pub confirmed: bool,
}

impl DiscoveredAccount {
    pub fn confirmed(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            confirmed: true,
        }
    }

    pub fn guess(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            confirmed: false,
        }
    }
}

/// Account lookups on one platform.
#[async_trait]
pub trait AccountSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Accounts that may belong to `pattern`.
    async fn discover(&self, pattern: &str) -> Result<Vec<DiscoveredAccount>, FetchError>;

    /// Profile for `handle`, running the requested secondary lookups.
    /// `Ok(None)` means the account does not exist.
    async fn fetch_profile(
        &self,
        handle: &str,
        lookups: SecondaryLookups,
    ) -> Result<Option<PlatformProfile>, FetchError>;
}

/// FIDE rating site lookups.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_reference_info(&self, fide_id: &str) -> Result<Option<ReferenceInfo>, FetchError>;
}
