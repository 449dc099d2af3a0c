//! Event relay: applies inbound client events to the room and fans the
//! resulting events out to the other connections.
//!
//! Each connection is a two-state machine: anonymous until a successful
//! username registration, identified from then on until disconnect.
//! Events that make no sense in the current state (registering twice,
//! chatting while anonymous) are ignored with a warning rather than
//! treated as errors; the only error a client ever sees is a rejected
//! username.

use banter_shared::event::{ClientEvent, ServerEvent};

use crate::state::{ConnId, Room};

/// Apply one inbound event from `conn_id`. The caller holds the room lock,
/// so the event is fully processed before any other is considered.
pub fn handle_event(room: &mut Room, conn_id: ConnId, event: ClientEvent) {
    match event {
        ClientEvent::RegisterUsername { username } => register_username(room, conn_id, username),
        ClientEvent::NewMessage { message } => relay_message(room, conn_id, message),
        ClientEvent::Typing => relay_typing(room, conn_id, true),
        ClientEvent::StopTyping => relay_typing(room, conn_id, false),
    }
}

/// Tear down a connection, whether it closed cleanly or dropped. Only
/// identified connections touch the registry; an anonymous disconnect
/// leaves it untouched and notifies nobody.
pub fn handle_disconnect(room: &mut Room, conn_id: ConnId) {
    let Some(client) = room.detach(conn_id) else {
        return;
    };
    let Some(username) = client.username else {
        tracing::debug!("Anonymous connection '{}' left", conn_id);
        return;
    };

    let num_users = room.registry.unregister(&username);
    tracing::info!("User '{}' left ({} online)", username, num_users);

    // The departed connection is already detached, so "everyone else"
    // is everyone remaining.
    room.broadcast_all(ServerEvent::UserLeft {
        username,
        num_users,
    });
    let usernames = room.registry.snapshot();
    room.broadcast_all(ServerEvent::OnlineUsers { usernames });
}

fn register_username(room: &mut Room, conn_id: ConnId, username: String) {
    if let Some(current) = room.username_of(conn_id) {
        tracing::warn!(
            "Connection '{}' is already registered as '{}'. Ignoring re-registration.",
            conn_id,
            current
        );
        return;
    }

    match room.registry.try_register(&username, conn_id) {
        Ok(num_users) => {
            room.set_username(conn_id, username.clone());
            tracing::info!("User '{}' joined ({} online)", username, num_users);

            room.send_to(conn_id, ServerEvent::Login { num_users });
            room.broadcast_except(
                conn_id,
                ServerEvent::UserJoined {
                    username,
                    num_users,
                },
            );
            let usernames = room.registry.snapshot();
            room.broadcast_all(ServerEvent::OnlineUsers { usernames });
        }
        Err(e) => {
            tracing::info!("Rejected username '{}': {}", username, e);
            room.send_to(
                conn_id,
                ServerEvent::Err {
                    message: e.to_string(),
                },
            );
        }
    }
}

fn relay_message(room: &Room, conn_id: ConnId, message: String) {
    let Some(username) = room.username_of(conn_id) else {
        tracing::warn!(
            "Ignoring message from anonymous connection '{}'",
            conn_id
        );
        return;
    };
    room.broadcast_except(
        conn_id,
        ServerEvent::NewMessage { username, message },
    );
}

fn relay_typing(room: &Room, conn_id: ConnId, started: bool) {
    let Some(username) = room.username_of(conn_id) else {
        tracing::warn!(
            "Ignoring typing event from anonymous connection '{}'",
            conn_id
        );
        return;
    };
    let event = if started {
        ServerEvent::Typing { username }
    } else {
        ServerEvent::StopTyping { username }
    };
    room.broadcast_except(conn_id, event);
}
