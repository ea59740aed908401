//! Turns a raw [`FactSet`] into [`NormalizedFacts`].
//!
//! Interfaces are read in the order of the `interfaces` fact. Only interfaces
//! reporting a non-zero MAC become candidates. The primary MAC is the value of
//! the boot interface fact when present, otherwise the first candidate.

use hostdisco_common::error::FactError;
use hostdisco_common::facts::{
    self, FactSet, INTERFACES_FACT, InterfaceFacts, NormalizedFacts,
};
use hostdisco_common::network::mac;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Normalizer {
    boot_interface_fact: String,
}

impl Normalizer {
    pub fn new(boot_interface_fact: impl Into<String>) -> Self {
        Self {
            boot_interface_fact: boot_interface_fact.into(),
        }
    }

    pub fn normalize(&self, raw: &FactSet) -> Result<NormalizedFacts, FactError> {
        let names: Vec<&str> = raw
            .get(INTERFACES_FACT)
            .ok_or_else(|| FactError::MalformedFacts("missing interfaces fact".into()))?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            return Err(FactError::MalformedFacts("interfaces fact is empty".into()));
        }

        let mut interfaces: Vec<InterfaceFacts> = Vec::with_capacity(names.len());
        for name in names {
            if let Some(iface) = collect_interface(raw, name)? {
                interfaces.push(iface);
            }
        }

        if interfaces.is_empty() {
            return Err(FactError::MalformedFacts(
                "no interface reports a MAC address".into(),
            ));
        }

        let primary_interface = match raw.get_non_empty(&self.boot_interface_fact) {
            Some(value) => {
                let boot_mac = mac::parse_mac(value).map_err(|_| FactError::InvalidMac {
                    key: self.boot_interface_fact.clone(),
                    value: value.to_string(),
                })?;
                let primary = interfaces
                    .iter()
                    .position(|iface| iface.mac == boot_mac)
                    .ok_or(FactError::BootInterfaceMismatch { mac: boot_mac })?;
                let sharing = interfaces.iter().filter(|iface| iface.mac == boot_mac).count();
                if sharing > 1 {
                    debug!(
                        "{sharing} interfaces report boot MAC {boot_mac}, using {}",
                        interfaces[primary].name
                    );
                }
                primary
            }
            None => {
                debug!(
                    "no {} fact, using first interface with a MAC",
                    self.boot_interface_fact
                );
                0
            }
        };

        Ok(NormalizedFacts {
            primary_mac: interfaces[primary_interface].mac,
            primary_interface,
            interfaces,
            facts: raw.clone(),
        })
    }
}

fn collect_interface(raw: &FactSet, name: &str) -> Result<Option<InterfaceFacts>, FactError> {
    let mac_key = facts::mac_fact(name);
    let Some(value) = raw.get_non_empty(&mac_key) else {
        return Ok(None);
    };

    let mac = mac::parse_mac(value).map_err(|_| FactError::InvalidMac {
        key: mac_key,
        value: value.to_string(),
    })?;
    if mac::is_zero(mac) {
        return Ok(None);
    }

    Ok(Some(InterfaceFacts {
        name: name.to_string(),
        mac,
        ipv4: parse_ip(raw, &facts::ipv4_fact(name)),
        ipv6: parse_ip(raw, &facts::ipv6_fact(name)),
    }))
}

fn parse_ip<T: std::str::FromStr>(raw: &FactSet, key: &str) -> Option<T> {
    let value = raw.get_non_empty(key)?;
    match value.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            warn!("ignoring unparseable {key}: {value:?}");
            None
        }
    }
}
