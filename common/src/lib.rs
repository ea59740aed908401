//! # Hostdisco Common
//!
//! Shared models for fact-based host discovery.
//!
//! * **[`facts`]**: Raw fact sets reported by booting machines and their normalized form.
//! * **[`host`]**: The discovered host entity and the events emitted around it.
//! * **[`network`]**: MAC address parsing and vendor identification.
//! * **[`config`]**: Discovery settings (naming, boot interface fact, defaults).
//! * **[`error`]**: Error types shared by every layer.

pub mod config;
pub mod error;
pub mod facts;
pub mod host;
pub mod network;
