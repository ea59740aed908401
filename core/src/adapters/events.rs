use hostdisco_common::host::{DiscoveryFailed, HostDiscovered};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::ports::events::EventSink;

/// Writes events to the log.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn host_discovered(&self, event: HostDiscovered) {
        info!(
            mac = %event.mac,
            organization = event.organization.as_deref().unwrap_or("-"),
            location = event.location.as_deref().unwrap_or("-"),
            "discovered new host {}",
            event.name
        );
    }

    fn discovery_failed(&self, event: DiscoveryFailed) {
        warn!(
            mac = event.mac.as_deref().unwrap_or("-"),
            "discovery failed: {}",
            event.reason
        );
    }
}

#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    Discovered(HostDiscovered),
    Failed(DiscoveryFailed),
}

/// Forwards events to an unbounded channel.
pub struct ChannelSink {
    tx: UnboundedSender<DiscoveryEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<DiscoveryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn host_discovered(&self, event: HostDiscovered) {
        if self.tx.send(DiscoveryEvent::Discovered(event)).is_err() {
            warn!("event receiver dropped, host discovered event lost");
        }
    }

    fn discovery_failed(&self, event: DiscoveryFailed) {
        if self.tx.send(DiscoveryEvent::Failed(event)).is_err() {
            warn!("event receiver dropped, discovery failed event lost");
        }
    }
}

pub struct NoopSink;

impl EventSink for NoopSink {
    fn host_discovered(&self, _event: HostDiscovered) {}
}
