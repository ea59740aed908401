//! Discovery settings.
//!
//! Every field has a default so an empty TOML document is a valid config.
//! Values are passed explicitly to the services that need them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BOOT_INTERFACE_FACT: &str = "discovery_bootif";
pub const DEFAULT_PREFIX: &str = "mac";

/// How a newly discovered host gets its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamingStrategy {
    /// Use the value of the first present hostname fact.
    #[default]
    Fact,
    /// Use the compact primary MAC.
    Mac,
    /// Use random hex digits.
    Random,
}

impl FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fact" => Ok(Self::Fact),
            "mac" | "mac-based" => Ok(Self::Mac),
            "random" | "random-name" => Ok(Self::Random),
            _ => Err(format!("unknown naming strategy: {s}")),
        }
    }
}

impl TryFrom<String> for NamingStrategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamingStrategy> for String {
    fn from(value: NamingStrategy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fact => "Fact",
            Self::Mac => "MAC",
            Self::Random => "Random",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Fact whose value is the MAC of the interface the machine booted from.
    pub boot_interface_fact: String,
    /// Facts tried in order when naming by [`NamingStrategy::Fact`].
    pub hostname_facts: Vec<String>,
    pub naming: NamingStrategy,
    /// Prepended to every generated name.
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,
    /// Refuse re-imports of an already registered MAC instead of refreshing it.
    pub error_on_existing: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            boot_interface_fact: DEFAULT_BOOT_INTERFACE_FACT.to_string(),
            hostname_facts: vec![DEFAULT_BOOT_INTERFACE_FACT.to_string()],
            naming: NamingStrategy::Fact,
            prefix: DEFAULT_PREFIX.to_string(),
            default_organization: None,
            default_location: None,
            error_on_existing: false,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boot_interface_fact.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "boot_interface_fact must not be empty".into(),
            ));
        }
        if let Some(first) = self.prefix.chars().next()
            && !first.is_ascii_alphabetic()
        {
            return Err(ConfigError::Invalid(format!(
                "prefix must start with a letter: {:?}",
                self.prefix
            )));
        }
        Ok(())
    }
}
