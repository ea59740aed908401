//! # Ports
//!
//! Traits the discovery service depends on. Concrete implementations live in
//! [`crate::adapters`]; callers may supply their own.

pub mod events;
pub mod extension;
pub mod repository;
pub mod vendors;
