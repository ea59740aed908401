use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use pnet::util::MacAddr;
use serde::Serialize;

use crate::facts::{FactSet, InterfaceFacts, NormalizedFacts};

/// A machine registered through discovery, identified by its primary MAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredHost {
    pub mac: MacAddr,
    pub name: String,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub interfaces: Vec<InterfaceFacts>,
    pub facts: FactSet,
    pub vendor: Option<String>,
    /// Annotations added by installed extensions.
    pub attributes: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub last_report: DateTime<Utc>,
}

impl DiscoveredHost {
    pub fn new(name: String, normalized: NormalizedFacts, now: DateTime<Utc>) -> Self {
        Self {
            mac: normalized.primary_mac,
            name,
            organization: None,
            location: None,
            interfaces: normalized.interfaces,
            facts: normalized.facts,
            vendor: None,
            attributes: BTreeMap::new(),
            created_at: now,
            last_report: now,
        }
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Replaces the reported facts, keeping identity and name.
    pub fn refresh(&mut self, normalized: NormalizedFacts, now: DateTime<Utc>) {
        self.interfaces = normalized.interfaces;
        self.facts = normalized.facts;
        self.last_report = now;
    }

    pub fn primary_interface(&self) -> Option<&InterfaceFacts> {
        self.interfaces.iter().find(|iface| iface.mac == self.mac)
    }

    /// IPv4 of the primary interface first, then any IPv4, then any IPv6.
    pub fn primary_ip(&self) -> Option<IpAddr> {
        self.primary_interface()
            .and_then(|iface| iface.ipv4)
            .or_else(|| self.interfaces.iter().find_map(|iface| iface.ipv4))
            .map(IpAddr::V4)
            .or_else(|| {
                self.primary_interface()
                    .and_then(|iface| iface.ipv6)
                    .or_else(|| self.interfaces.iter().find_map(|iface| iface.ipv6))
                    .map(IpAddr::V6)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    New,
    Existing(Box<DiscoveredHost>),
}

/// Emitted once, when a MAC is registered for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDiscovered {
    pub mac: String,
    pub name: String,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&DiscoveredHost> for HostDiscovered {
    fn from(host: &DiscoveredHost) -> Self {
        Self {
            mac: host.mac.to_string(),
            name: host.name.clone(),
            organization: host.organization.clone(),
            location: host.location.clone(),
            timestamp: host.created_at,
        }
    }
}

/// Emitted when a submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryFailed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
