//! # Adapters
//!
//! In-process implementations of [`crate::ports`].
//!
//! * [`memory::InMemoryHostRepository`]: host store with a MAC uniqueness constraint.
//! * [`events`]: sinks that log, forward over a channel, or drop events.
//! * [`vendors::MacOuiRepo`]: vendor lookup backed by the bundled OUI database.

pub mod events;
pub mod memory;
pub mod vendors;
