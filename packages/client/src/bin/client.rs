//! Banter terminal chat client binary.
//!
//! Connects to a relay, registers the given username, and exchanges
//! messages from stdin. A rejected username exits with an error; rerun
//! with a different name.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin banter-client -- alice
//! cargo run --bin banter-client -- alice --url ws://example.org:8080/ws
//! ```

use banter_client::ClientError;
use banter_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "banter-client")]
#[command(about = "Terminal client for the Banter chat relay", long_about = None)]
struct Args {
    /// Username to register (must not be in use)
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    // The relay expects pre-cleaned usernames
    let username = args.username.trim().to_string();
    if username.is_empty() {
        eprintln!("Username must not be empty");
        std::process::exit(1);
    }

    if let Err(e) = banter_client::run_client(args.url, username).await {
        match e {
            ClientError::UsernameTaken(message) => eprintln!("{}", message),
            other => tracing::error!("Client error: {}", other),
        }
        std::process::exit(1);
    }
}
