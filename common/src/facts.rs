//! # Fact Model
//!
//! A [`FactSet`] is the flat key/value inventory a booting machine reports.
//! Interface facts follow a naming convention:
//!
//! * `interfaces`: comma separated interface names, e.g. `lo,eth0,eth1`.
//! * `macaddress_<iface>`, `ipaddress_<iface>`, `ipaddress6_<iface>`.
//!
//! [`NormalizedFacts`] is the validated view with the primary MAC resolved.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FactsLoadError;

pub const INTERFACES_FACT: &str = "interfaces";
pub const ORGANIZATION_FACT: &str = "foreman_organization";
pub const LOCATION_FACT: &str = "foreman_location";

/// Facts documents may wrap the map under this key.
const FACTS_ROOT: &str = "facts";

pub fn mac_fact(iface: &str) -> String {
    format!("macaddress_{iface}")
}

pub fn ipv4_fact(iface: &str) -> String {
    format!("ipaddress_{iface}")
}

pub fn ipv6_fact(iface: &str) -> String {
    format!("ipaddress6_{iface}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSet(BTreeMap<String, String>);

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value only when it is present and not blank.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a JSON facts document.
    ///
    /// Both a flat object and one nested under a root `facts` key are accepted.
    /// Numbers and booleans are kept as text; nulls, arrays and nested objects are dropped.
    pub fn from_json_str(text: &str) -> Result<Self, FactsLoadError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut root) = value else {
            return Err(FactsLoadError::NotAnObject);
        };

        let map = match root.remove(FACTS_ROOT) {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                root.insert(FACTS_ROOT.to_string(), other);
                root
            }
            None => root,
        };

        let facts = map
            .into_iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v)))
            .collect();

        Ok(Self(facts))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, FactsLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| FactsLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FactSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One interface that reported a MAC address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFacts {
    pub name: String,
    pub mac: MacAddr,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFacts {
    pub primary_mac: MacAddr,
    /// Index into `interfaces` of the interface carrying `primary_mac`.
    pub primary_interface: usize,
    /// In the order given by the `interfaces` fact.
    pub interfaces: Vec<InterfaceFacts>,
    pub facts: FactSet,
}

impl NormalizedFacts {
    pub fn primary(&self) -> &InterfaceFacts {
        &self.interfaces[self.primary_interface]
    }
}
