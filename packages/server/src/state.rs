//! Server state and connection management.

use std::collections::HashMap;

use banter_shared::event::ServerEvent;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::registry::SessionRegistry;

/// Identity of one live connection, assigned at attach time.
pub type ConnId = Uuid;

/// One connection's relay-side record.
pub struct ClientInfo {
    /// Outbound event queue, drained by the connection's send task.
    pub sender: mpsc::UnboundedSender<ServerEvent>,
    /// `None` while anonymous; set exactly once at successful registration.
    pub username: Option<String>,
}

/// All relay state: the connection map and the username registry.
///
/// Lives behind a single mutex so each inbound event is fully applied
/// before the next one is considered, whatever thread the runtime runs
/// the handler on.
#[derive(Default)]
pub struct Room {
    clients: HashMap<ConnId, ClientInfo>,
    pub registry: SessionRegistry,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly upgraded connection in the anonymous state.
    pub fn attach(&mut self, conn_id: ConnId, sender: mpsc::UnboundedSender<ServerEvent>) {
        self.clients.insert(
            conn_id,
            ClientInfo {
                sender,
                username: None,
            },
        );
    }

    /// Remove a connection, returning its record if it was attached.
    pub fn detach(&mut self, conn_id: ConnId) -> Option<ClientInfo> {
        self.clients.remove(&conn_id)
    }

    pub fn set_username(&mut self, conn_id: ConnId, username: String) {
        if let Some(client) = self.clients.get_mut(&conn_id) {
            client.username = Some(username);
        }
    }

    pub fn username_of(&self, conn_id: ConnId) -> Option<String> {
        self.clients.get(&conn_id)?.username.clone()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Queue an event for a single connection.
    pub fn send_to(&self, conn_id: ConnId, event: ServerEvent) {
        if let Some(client) = self.clients.get(&conn_id)
            && client.sender.send(event).is_err()
        {
            tracing::warn!("Failed to queue event for connection '{}'", conn_id);
        }
    }

    /// Queue an event for every connection except the originator.
    pub fn broadcast_except(&self, origin: ConnId, event: ServerEvent) {
        for (conn_id, client) in self.clients.iter() {
            if *conn_id != origin && client.sender.send(event.clone()).is_err() {
                tracing::warn!("Failed to queue event for connection '{}'", conn_id);
            }
        }
    }

    /// Queue an event for every connection, originator included.
    pub fn broadcast_all(&self, event: ServerEvent) {
        for (conn_id, client) in self.clients.iter() {
            if client.sender.send(event.clone()).is_err() {
                tracing::warn!("Failed to queue event for connection '{}'", conn_id);
            }
        }
    }
}

/// Shared application state handed to every handler.
#[derive(Default)]
pub struct AppState {
    pub room: Mutex<Room>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
