//! Network primitives used to identify discovered machines.

pub mod mac;
