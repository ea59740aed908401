//! # Host Registrar
//!
//! Creates or refreshes [`DiscoveredHost`] records.
//!
//! * **New MAC**: the host is named, assigned an organization and location,
//!   enriched (vendor, extension), stored, and announced through the [`EventSink`].
//! * **Known MAC**: facts and interfaces are replaced in place. Identity and
//!   name never change and no event is emitted.
//!
//! Callers serialize registrations per MAC (see [`crate::locks`]). A
//! [`StoreError::Conflict`] on insert means another writer won the race; the
//! registrar then refreshes the record that writer created.

use std::sync::Arc;

use chrono::Utc;
use hostdisco_common::config::DiscoveryConfig;
use hostdisco_common::error::{ImportError, StoreError};
use hostdisco_common::facts::{LOCATION_FACT, NormalizedFacts, ORGANIZATION_FACT};
use hostdisco_common::host::{DiscoveredHost, HostDiscovered, MatchResult};
use tracing::{debug, info, warn};

use crate::naming;
use crate::ports::events::EventSink;
use crate::ports::extension::{Extension, NoExtensions};
use crate::ports::repository::HostRepository;
use crate::ports::vendors::VendorRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(DiscoveredHost),
    Updated(DiscoveredHost),
}

impl Registration {
    pub fn host(&self) -> &DiscoveredHost {
        match self {
            Self::Created(host) | Self::Updated(host) => host,
        }
    }

    pub fn into_host(self) -> DiscoveredHost {
        match self {
            Self::Created(host) | Self::Updated(host) => host,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

pub struct HostRegistrar {
    cfg: Arc<DiscoveryConfig>,
    repo: Arc<dyn HostRepository>,
    sink: Arc<dyn EventSink>,
    vendors: Option<Arc<dyn VendorRepository>>,
    extension: Arc<dyn Extension>,
}

impl HostRegistrar {
    pub fn new(
        cfg: Arc<DiscoveryConfig>,
        repo: Arc<dyn HostRepository>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            cfg,
            repo,
            sink,
            vendors: None,
            extension: Arc::new(NoExtensions),
        }
    }

    pub fn with_vendors(mut self, vendors: Arc<dyn VendorRepository>) -> Self {
        self.vendors = Some(vendors);
        self
    }

    pub fn with_extension(mut self, extension: Arc<dyn Extension>) -> Self {
        info!("extension {} installed", extension.name());
        self.extension = extension;
        self
    }

    pub async fn register(
        &self,
        normalized: NormalizedFacts,
        matched: MatchResult,
    ) -> Result<Registration, ImportError> {
        match matched {
            MatchResult::Existing(host) => self.refresh(*host, normalized).await,
            MatchResult::New => self.create(normalized).await,
        }
    }

    async fn create(&self, normalized: NormalizedFacts) -> Result<Registration, ImportError> {
        let name = naming::derive_name(&self.cfg, &normalized)?;
        let organization = normalized
            .facts
            .get_non_empty(ORGANIZATION_FACT)
            .map(str::to_string)
            .or_else(|| self.cfg.default_organization.clone());
        let location = normalized
            .facts
            .get_non_empty(LOCATION_FACT)
            .map(str::to_string)
            .or_else(|| self.cfg.default_location.clone());

        let mut host = DiscoveredHost::new(name, normalized.clone(), Utc::now())
            .with_organization(organization)
            .with_location(location);
        host.vendor = self.vendors.as_ref().and_then(|v| v.get_vendor(host.mac));
        self.extension.annotate(&mut host);

        match self.repo.insert(host.clone()).await {
            Ok(()) => {
                debug!("stored new host {} ({})", host.name, host.mac);
                self.sink.host_discovered(HostDiscovered::from(&host));
                Ok(Registration::Created(host))
            }
            Err(StoreError::Conflict { mac }) => {
                warn!("lost create race for {mac}, refreshing existing record");
                match self.repo.find_by_mac(mac).await? {
                    Some(existing) => self.refresh(existing, normalized).await,
                    None => Err(StoreError::Conflict { mac }.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn refresh(
        &self,
        mut host: DiscoveredHost,
        normalized: NormalizedFacts,
    ) -> Result<Registration, ImportError> {
        if self.cfg.error_on_existing {
            return Err(ImportError::AlreadyRegistered { mac: host.mac });
        }

        host.refresh(normalized, Utc::now());
        self.repo.update(host.clone()).await?;
        debug!("refreshed facts of {} ({})", host.name, host.mac);
        Ok(Registration::Updated(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::{ChannelSink, DiscoveryEvent};
    use crate::adapters::memory::InMemoryHostRepository;
    use async_trait::async_trait;
    use hostdisco_common::facts::{FactSet, InterfaceFacts};
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;

    const MAC: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);

    fn normalized(ip: [u8; 4], extra: &[(&str, &str)]) -> NormalizedFacts {
        let mut facts: FactSet = extra.iter().copied().collect();
        facts.insert("interfaces", "eth0");
        facts.insert("macaddress_eth0", "AA:BB:CC:DD:EE:FF");
        facts.insert("discovery_bootif", "AA:BB:CC:DD:EE:FF");
        NormalizedFacts {
            primary_mac: MAC,
            primary_interface: 0,
            interfaces: vec![InterfaceFacts {
                name: "eth0".into(),
                mac: MAC,
                ipv4: Some(Ipv4Addr::from(ip)),
                ipv6: None,
            }],
            facts,
        }
    }

    fn config() -> DiscoveryConfig {
        DiscoveryConfig {
            default_organization: Some("Organization 1".into()),
            default_location: Some("Location 1".into()),
            ..DiscoveryConfig::default()
        }
    }

    struct Fixture {
        registrar: HostRegistrar,
        repo: Arc<InMemoryHostRepository>,
        events: tokio::sync::mpsc::UnboundedReceiver<DiscoveryEvent>,
    }

    fn fixture(cfg: DiscoveryConfig) -> Fixture {
        let repo = Arc::new(InMemoryHostRepository::new());
        let (sink, events) = ChannelSink::new();
        let registrar = HostRegistrar::new(Arc::new(cfg), repo.clone(), Arc::new(sink));
        Fixture { registrar, repo, events }
    }

    #[tokio::test]
    async fn new_host_gets_name_defaults_and_one_event() {
        let mut fx = fixture(config());
        let reg = fx
            .registrar
            .register(normalized([192, 168, 100, 42], &[]), MatchResult::New)
            .await
            .unwrap();

        assert!(reg.is_created());
        let host = reg.host();
        assert_eq!(host.name, "macaabbccddeeff");
        assert_eq!(host.organization.as_deref(), Some("Organization 1"));
        assert_eq!(host.location.as_deref(), Some("Location 1"));
        assert_eq!(fx.repo.len().await, 1);

        match fx.events.try_recv() {
            Ok(DiscoveryEvent::Discovered(event)) => {
                assert_eq!(event.mac, "aa:bb:cc:dd:ee:ff");
                assert_eq!(event.name, "macaabbccddeeff");
            }
            other => panic!("expected discovered event, got {other:?}"),
        }
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn organization_and_location_facts_win_over_defaults() {
        let fx = fixture(config());
        let facts = normalized(
            [10, 0, 0, 1],
            &[("foreman_organization", "Org X"), ("foreman_location", "Loc Y")],
        );
        let reg = fx.registrar.register(facts, MatchResult::New).await.unwrap();
        assert_eq!(reg.host().organization.as_deref(), Some("Org X"));
        assert_eq!(reg.host().location.as_deref(), Some("Loc Y"));
    }

    #[tokio::test]
    async fn existing_host_is_refreshed_without_event() {
        let mut fx = fixture(config());
        let first = fx
            .registrar
            .register(normalized([192, 168, 100, 42], &[]), MatchResult::New)
            .await
            .unwrap()
            .into_host();
        let _ = fx.events.try_recv();

        let reg = fx
            .registrar
            .register(
                normalized([192, 168, 100, 43], &[("hostname", "renamed")]),
                MatchResult::Existing(Box::new(first.clone())),
            )
            .await
            .unwrap();

        assert!(!reg.is_created());
        assert_eq!(reg.host().name, first.name);
        assert_eq!(reg.host().created_at, first.created_at);
        let stored = fx.repo.find_by_mac(MAC).await.unwrap().unwrap();
        assert_eq!(stored.interfaces[0].ipv4, Some(Ipv4Addr::new(192, 168, 100, 43)));
        assert_eq!(stored.facts.get("hostname"), Some("renamed"));
        assert!(fx.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn error_on_existing_rejects_reimport() {
        let fx = fixture(DiscoveryConfig {
            error_on_existing: true,
            ..config()
        });
        let host = fx
            .registrar
            .register(normalized([10, 0, 0, 1], &[]), MatchResult::New)
            .await
            .unwrap()
            .into_host();

        let err = fx
            .registrar
            .register(normalized([10, 0, 0, 1], &[]), MatchResult::Existing(Box::new(host)))
            .await
            .unwrap_err();
        assert_eq!(err, ImportError::AlreadyRegistered { mac: MAC });
    }

    /// Simulates another writer inserting the same MAC between match and insert.
    struct RacingRepository {
        inner: InMemoryHostRepository,
    }

    #[async_trait]
    impl HostRepository for RacingRepository {
        async fn find_by_mac(&self, mac: MacAddr) -> Result<Option<DiscoveredHost>, StoreError> {
            self.inner.find_by_mac(mac).await
        }

        async fn insert(&self, host: DiscoveredHost) -> Result<(), StoreError> {
            let mut winner = host.clone();
            winner.name = "winner".into();
            self.inner.insert(winner).await?;
            self.inner.insert(host).await
        }

        async fn update(&self, host: DiscoveredHost) -> Result<(), StoreError> {
            self.inner.update(host).await
        }

        async fn list(&self) -> Result<Vec<DiscoveredHost>, StoreError> {
            self.inner.list().await
        }
    }

    #[tokio::test]
    async fn lost_insert_race_becomes_update() {
        let repo = Arc::new(RacingRepository {
            inner: InMemoryHostRepository::new(),
        });
        let (sink, mut events) = ChannelSink::new();
        let registrar = HostRegistrar::new(Arc::new(config()), repo.clone(), Arc::new(sink));

        let reg = registrar
            .register(normalized([10, 0, 0, 7], &[]), MatchResult::New)
            .await
            .unwrap();

        assert!(!reg.is_created());
        assert_eq!(reg.host().name, "winner");
        assert_eq!(reg.host().interfaces[0].ipv4, Some(Ipv4Addr::new(10, 0, 0, 7)));
        assert_eq!(repo.inner.len().await, 1);
        assert!(events.try_recv().is_err());
    }

    /// Reports a conflict on insert but never returns the conflicting record.
    struct PhantomConflictRepository;

    #[async_trait]
    impl HostRepository for PhantomConflictRepository {
        async fn find_by_mac(&self, _mac: MacAddr) -> Result<Option<DiscoveredHost>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, host: DiscoveredHost) -> Result<(), StoreError> {
            Err(StoreError::Conflict { mac: host.mac })
        }

        async fn update(&self, _host: DiscoveredHost) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("no record to update".into()))
        }

        async fn list(&self) -> Result<Vec<DiscoveredHost>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn unresolved_conflict_is_returned() {
        let (sink, mut events) = ChannelSink::new();
        let registrar = HostRegistrar::new(
            Arc::new(config()),
            Arc::new(PhantomConflictRepository),
            Arc::new(sink),
        );

        let err = registrar
            .register(normalized([10, 0, 0, 8], &[]), MatchResult::New)
            .await
            .unwrap_err();

        assert_eq!(err, ImportError::Store(StoreError::Conflict { mac: MAC }));
        assert!(events.try_recv().is_err());
    }

    struct RackExtension;

    impl Extension for RackExtension {
        fn name(&self) -> &str {
            "rack"
        }

        fn annotate(&self, host: &mut DiscoveredHost) {
            host.attributes.insert("rack".into(), "r12".into());
        }
    }

    struct FixedVendor;

    impl VendorRepository for FixedVendor {
        fn get_vendor(&self, _mac_addr: MacAddr) -> Option<String> {
            Some("Acme Networks".into())
        }
    }

    #[tokio::test]
    async fn extension_and_vendor_enrich_new_hosts() {
        let repo = Arc::new(InMemoryHostRepository::new());
        let registrar = HostRegistrar::new(Arc::new(config()), repo, Arc::new(crate::adapters::events::NoopSink))
            .with_vendors(Arc::new(FixedVendor))
            .with_extension(Arc::new(RackExtension));

        let reg = registrar
            .register(normalized([10, 0, 0, 1], &[]), MatchResult::New)
            .await
            .unwrap();
        assert_eq!(reg.host().vendor.as_deref(), Some("Acme Networks"));
        assert_eq!(reg.host().attributes.get("rack").map(String::as_str), Some("r12"));
    }
}
