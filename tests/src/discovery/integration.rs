#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::sync::Arc;

use hostdisco_common::config::{DiscoveryConfig, NamingStrategy};
use hostdisco_common::error::{FactError, ImportError};
use hostdisco_common::facts::FactSet;
use hostdisco_common::network::mac::parse_mac;
use hostdisco_core::adapters::events::{ChannelSink, DiscoveryEvent};
use hostdisco_core::adapters::memory::InMemoryHostRepository;
use hostdisco_core::adapters::vendors::NoVendorLookup;
use hostdisco_core::discovery::DiscoveryService;
use hostdisco_core::registrar::Registration;
use tokio::sync::mpsc::UnboundedReceiver;

fn parse_json_fixture(name: &str) -> FactSet {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("facts")
        .join(format!("{name}.json"));
    FactSet::from_json_file(&path).unwrap()
}

fn default_settings() -> DiscoveryConfig {
    DiscoveryConfig {
        default_organization: Some("Organization 1".into()),
        default_location: Some("Location 1".into()),
        ..DiscoveryConfig::default()
    }
}

struct Harness {
    service: Arc<DiscoveryService>,
    repo: Arc<InMemoryHostRepository>,
    events: UnboundedReceiver<DiscoveryEvent>,
}

impl Harness {
    fn new(cfg: DiscoveryConfig) -> Self {
        let repo = Arc::new(InMemoryHostRepository::new());
        let (sink, events) = ChannelSink::new();
        let service = DiscoveryService::new(cfg, repo.clone(), Arc::new(sink))
            .unwrap()
            .with_vendors(Arc::new(NoVendorLookup));
        Self {
            service: Arc::new(service),
            repo,
            events,
        }
    }

    fn discovered_events(&mut self) -> Vec<DiscoveryEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if matches!(event, DiscoveryEvent::Discovered(_)) {
                events.push(event);
            }
        }
        events
    }
}

#[tokio::test]
async fn first_import_creates_host_and_announces_it() {
    let mut h = Harness::new(default_settings());
    let facts = parse_json_fixture("simple_network100_42");

    let reg = h.service.import_host(&facts).await.unwrap();

    assert!(reg.is_created());
    let host = reg.host();
    assert_eq!(host.mac, parse_mac("AA:BB:CC:DD:EE:FF").unwrap());
    assert_eq!(host.name, "macaabbccddeeff");
    assert_eq!(host.organization.as_deref(), Some("Organization 1"));
    assert_eq!(host.location.as_deref(), Some("Location 1"));
    assert_eq!(host.primary_ip(), Some(IpAddr::V4(Ipv4Addr::new(192, 168, 100, 42))));
    assert_eq!(host.facts, facts);

    let events = h.discovered_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DiscoveryEvent::Discovered(event) => {
            assert_eq!(event.mac, "aa:bb:cc:dd:ee:ff");
            assert_eq!(event.name, "macaabbccddeeff");
            assert_eq!(event.organization.as_deref(), Some("Organization 1"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn second_import_updates_without_event() {
    let mut h = Harness::new(default_settings());
    let facts = parse_json_fixture("simple_network100_42");

    let first = h.service.import_host(&facts).await.unwrap().into_host();
    h.discovered_events();

    let second = h.service.import_host(&facts).await.unwrap();

    assert!(matches!(second, Registration::Updated(_)));
    assert_eq!(second.host().name, first.name);
    assert_eq!(second.host().created_at, first.created_at);
    assert!(second.host().last_report >= first.last_report);
    assert_eq!(h.repo.len().await, 1);
    assert!(h.discovered_events().is_empty());
}

#[tokio::test]
async fn mac_notation_does_not_change_identity() {
    let h = Harness::new(default_settings());
    let lower: FactSet = [
        ("interfaces", "eth0"),
        ("macaddress_eth0", "aa:bb:cc:dd:ee:ff"),
        ("ipaddress_eth0", "10.0.0.1"),
    ]
    .into_iter()
    .collect();
    let upper: FactSet = [
        ("interfaces", "eth0"),
        ("macaddress_eth0", "AA-BB-CC-DD-EE-FF"),
        ("ipaddress_eth0", "10.0.0.2"),
    ]
    .into_iter()
    .collect();

    assert!(h.service.import_host(&lower).await.unwrap().is_created());
    let reg = h.service.import_host(&upper).await.unwrap();

    assert!(!reg.is_created());
    assert_eq!(h.repo.len().await, 1);
    assert_eq!(reg.host().primary_ip(), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
}

#[tokio::test]
async fn empty_interfaces_is_rejected() {
    let mut h = Harness::new(default_settings());
    let mut facts = parse_json_fixture("simple_network100_42");
    facts.insert("interfaces", "");

    let err = h.service.import_host(&facts).await.unwrap_err();

    assert!(matches!(err, ImportError::Facts(FactError::MalformedFacts(_))));
    assert!(h.repo.is_empty().await);
    assert!(h.discovered_events().is_empty());
}

#[tokio::test]
async fn unknown_boot_mac_is_rejected() {
    let h = Harness::new(default_settings());
    let mut facts = parse_json_fixture("simple_network100_42");
    facts.insert("discovery_bootif", "AA:BB:CC:DD:EE:00");

    let err = h.service.import_host(&facts).await.unwrap_err();

    assert_eq!(
        err,
        ImportError::Facts(FactError::BootInterfaceMismatch {
            mac: parse_mac("AA:BB:CC:DD:EE:00").unwrap()
        })
    );
    assert!(h.repo.is_empty().await);
}

#[tokio::test]
async fn ipv6_only_host_is_registered() {
    let h = Harness::new(default_settings());
    let facts = parse_json_fixture("network_2001_db8");

    let reg = h.service.import_host(&facts).await.unwrap();

    assert_eq!(reg.host().mac, parse_mac("AA:BB:CC:DD:EE:FA").unwrap());
    assert_eq!(reg.host().name, "macaabbccddeefa");
    assert_eq!(
        reg.host().primary_ip(),
        Some(IpAddr::V6("2001:db8::1".parse::<Ipv6Addr>().unwrap()))
    );
}

#[tokio::test]
async fn facts_override_default_organization_and_location() {
    let h = Harness::new(default_settings());
    let facts = parse_json_fixture("regular_host");

    let host = h.service.import_host(&facts).await.unwrap().into_host();

    assert_eq!(host.name, "mace41f13cc365a");
    assert_eq!(host.organization.as_deref(), Some("Engineering"));
    assert_eq!(host.location.as_deref(), Some("Brno"));
    assert_eq!(host.interfaces.len(), 2);
    assert_eq!(host.facts.get("memorysize_mb"), Some("7983.84"));
}

#[tokio::test]
async fn mac_naming_strategy() {
    let h = Harness::new(DiscoveryConfig {
        naming: NamingStrategy::Mac,
        prefix: "node-".into(),
        ..default_settings()
    });
    let facts = parse_json_fixture("regular_host");

    let host = h.service.import_host(&facts).await.unwrap().into_host();
    assert_eq!(host.name, "node-e41f13cc365a");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_imports_for_one_mac_create_one_host() {
    let mut h = Harness::new(default_settings());
    let mut first = parse_json_fixture("simple_network100_42");
    let mut second = first.clone();
    first.insert("ipaddress_eth0", "192.168.100.42");
    second.insert("ipaddress_eth0", "192.168.100.43");

    let a = {
        let service = h.service.clone();
        tokio::spawn(async move { service.import_host(&first).await })
    };
    let b = {
        let service = h.service.clone();
        tokio::spawn(async move { service.import_host(&second).await })
    };
    let a = a.await.unwrap().unwrap();
    let b = b.await.unwrap().unwrap();

    assert_eq!(h.repo.len().await, 1);
    assert_eq!([a.is_created(), b.is_created()].iter().filter(|c| **c).count(), 1);
    assert_eq!(h.discovered_events().len(), 1);

    let last_committed = if a.is_created() { b.host() } else { a.host() };
    let stored = h.service.host(last_committed.mac).await.unwrap().unwrap();
    assert_eq!(stored.primary_ip(), last_committed.primary_ip());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn retried_submissions_never_duplicate() {
    let mut h = Harness::new(default_settings());
    let facts = Arc::new(parse_json_fixture("simple_network100_42"));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = h.service.clone();
            let facts = facts.clone();
            tokio::spawn(async move { service.import_host(&facts).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_created() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(h.repo.len().await, 1);
    assert_eq!(h.discovered_events().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_macs_import_in_parallel() {
    let mut h = Harness::new(default_settings());

    let handles: Vec<_> = (0..32u8)
        .map(|n| {
            let service = h.service.clone();
            let facts: FactSet = [
                ("interfaces".to_string(), "eth0".to_string()),
                ("macaddress_eth0".to_string(), format!("02:00:00:00:00:{n:02x}")),
                ("ipaddress_eth0".to_string(), format!("10.0.1.{n}")),
            ]
            .into_iter()
            .collect();
            tokio::spawn(async move { service.import_host(&facts).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_created());
    }

    assert_eq!(h.repo.len().await, 32);
    assert_eq!(h.discovered_events().len(), 32);
    assert_eq!(h.service.hosts().await.unwrap().len(), 32);
}
