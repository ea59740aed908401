use async_trait::async_trait;
use hostdisco_common::error::StoreError;
use hostdisco_common::host::DiscoveredHost;
use pnet::util::MacAddr;

/// Persistence for discovered hosts, keyed by primary MAC.
#[async_trait]
pub trait HostRepository: Send + Sync {
    async fn find_by_mac(&self, mac: MacAddr) -> Result<Option<DiscoveredHost>, StoreError>;

    /// Stores a new record.
    ///
    /// Must fail with [`StoreError::Conflict`] when a record for the MAC exists.
    async fn insert(&self, host: DiscoveredHost) -> Result<(), StoreError>;

    /// Replaces an existing record.
    async fn update(&self, host: DiscoveredHost) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<DiscoveredHost>, StoreError>;
}
