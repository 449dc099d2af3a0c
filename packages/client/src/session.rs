//! WebSocket client session management.
//!
//! Connects, registers the username in-band, then runs three loops: a read
//! task rendering relayed events, a blocking rustyline thread feeding an
//! input channel, and a write task emitting chat messages. Typing indicators from other users are rendered; this
//! client does not emit its own, since a line-oriented prompt cannot
//! observe keystrokes.

use banter_shared::event::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use super::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run the chat client session until the user exits or the connection drops.
///
/// # Errors
///
/// Returns [`ClientError::UsernameTaken`] if the server rejects the
/// username, [`ClientError::Connection`] if the connection fails or drops.
pub async fn run_client(url: String, username: String) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;
    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();

    // Register the username before anything else
    let register = ClientEvent::RegisterUsername {
        username: username.clone(),
    };
    send_event(&mut write, &register).await?;

    // Wait for the login ack; the server answers a rejected name with `err`
    loop {
        let frame = read
            .next()
            .await
            .ok_or_else(|| ClientError::Connection("Connection closed during login".to_string()))?
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let Message::Text(text) = frame else {
            continue;
        };
        let Ok(event) = serde_json::from_str::<ServerEvent>(&text) else {
            tracing::warn!("Ignoring unparseable frame: {}", text);
            continue;
        };

        match event {
            ServerEvent::Login { num_users } => {
                print!("{}", MessageFormatter::format_welcome(&username, num_users));
                break;
            }
            ServerEvent::Err { message } => {
                return Err(ClientError::UsernameTaken(message));
            }
            // Broadcasts from users active before our login ack arrives
            other => print_event(&other, &username),
        }
    }

    // Spawn a task to render incoming events
    let username_for_read = username.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            print_event(&event, &username_for_read);
                            redisplay_prompt(&username_for_read);
                        }
                        Err(e) => tracing::warn!("Unparseable frame: {} ({})", text, e),
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", username);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    // Pre-clean input here; the relay forwards text as-is
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to forward input lines to the relay
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = ClientEvent::NewMessage { message: line };
            if let Err(e) = send_event(&mut write, &event).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::Connection("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::Connection("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}

async fn send_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::Connection(e.to_string()))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))
}

fn print_event(event: &ServerEvent, me: &str) {
    match event {
        ServerEvent::NewMessage { username, message } => {
            print!("{}", MessageFormatter::format_chat_message(username, message));
        }
        ServerEvent::UserJoined {
            username,
            num_users,
        } => {
            print!("{}", MessageFormatter::format_user_joined(username, *num_users));
        }
        ServerEvent::UserLeft {
            username,
            num_users,
        } => {
            print!("{}", MessageFormatter::format_user_left(username, *num_users));
        }
        ServerEvent::OnlineUsers { usernames } => {
            print!("{}", MessageFormatter::format_online_users(usernames, me));
        }
        ServerEvent::Typing { username } => {
            print!("{}", MessageFormatter::format_typing(username));
        }
        // Terminal output cannot be retracted, so stop-typing is consumed
        // silently; login/err are handled during the login phase only.
        ServerEvent::StopTyping { .. } | ServerEvent::Login { .. } | ServerEvent::Err { .. } => {}
    }
}
