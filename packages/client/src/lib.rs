//! Terminal client for the Banter chat relay.

mod error;
mod formatter;
mod session;
mod ui;

pub use error::ClientError;
pub use session::run_client;
