//! Banter chat relay server.
//!
//! Clients connect over a WebSocket, register a username, and the relay
//! fans chat messages, typing indicators, and presence updates out to the
//! other connections. All state is in-memory and dies with the process.

mod handler;
pub mod registry;
pub mod relay;
mod signal;
pub mod runner;
pub mod state;

pub use runner::{app, run_server};
