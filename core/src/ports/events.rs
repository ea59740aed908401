use hostdisco_common::host::{DiscoveryFailed, HostDiscovered};

/// Receives discovery notifications.
///
/// Implementations must not block; delivery is the sink's concern.
pub trait EventSink: Send + Sync {
    fn host_discovered(&self, event: HostDiscovered);

    fn discovery_failed(&self, _event: DiscoveryFailed) {} // Default: drop
}
