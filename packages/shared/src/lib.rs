//! Shared library for the Banter chat relay.
//!
//! Holds the wire event catalogue exchanged between server and clients,
//! plus logging and time utilities used by both binaries.

pub mod event;
pub mod logger;
pub mod time;
