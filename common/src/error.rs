//! Error types for every discovery stage.
//!
//! Fact and import errors are fatal to the submission they belong to and are
//! reported to the caller. [`StoreError::Conflict`] is the only variant the
//! registrar recovers from on its own.

use std::path::PathBuf;

use pnet::util::MacAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FactError {
    /// The fact set does not describe any usable interface.
    #[error("malformed facts: {0}")]
    MalformedFacts(String),
    /// The boot interface fact names a MAC no interface reports.
    #[error("boot interface MAC {mac} does not match any reported interface")]
    BootInterfaceMismatch { mac: MacAddr },
    #[error("fact {key} holds an invalid MAC address: {value:?}")]
    InvalidMac { key: String, value: String },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    /// Another writer created a record for this MAC first.
    #[error("a host with MAC {mac} already exists")]
    Conflict { mac: MacAddr },
    #[error("host store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ImportError {
    #[error(transparent)]
    Facts(#[from] FactError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("host with MAC {mac} is already registered")]
    AlreadyRegistered { mac: MacAddr },
    #[error("cannot derive a valid hostname from {0:?}")]
    InvalidHostname(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FactsLoadError {
    #[error("failed to read facts {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse facts: {0}")]
    Json(#[from] serde_json::Error),
    #[error("facts document must be a JSON object")]
    NotAnObject,
}
