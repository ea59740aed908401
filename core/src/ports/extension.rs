use hostdisco_common::host::DiscoveredHost;

/// An optional companion that contributes data to newly registered hosts.
///
/// Extensions are handed to the registrar when it is built. With none
/// installed the registrar uses [`NoExtensions`].
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    /// Called once per new host, before it is stored.
    fn annotate(&self, host: &mut DiscoveredHost);
}

pub struct NoExtensions;

impl Extension for NoExtensions {
    fn name(&self) -> &str {
        "none"
    }

    fn annotate(&self, _host: &mut DiscoveredHost) {}
}
