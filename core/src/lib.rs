//! # Hostdisco Core
//!
//! Registers machines from the facts they report while network booting.
//!
//! [`discovery::DiscoveryService`] is the entry point. It wires the
//! [`normalizer`], [`matcher`] and [`registrar`] stages together around the
//! per-MAC [`locks`], and talks to the outside world only through [`ports`].

pub mod adapters;
pub mod discovery;
pub mod locks;
pub mod matcher;
pub mod naming;
pub mod normalizer;
pub mod ports;
pub mod registrar;
