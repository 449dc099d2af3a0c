//! Wire event catalogue.
//!
//! Every frame on the wire is a JSON object tagged by `"type"`. Event names
//! and payload fields follow the relay's protocol: camelCase fields, event
//! names with spaces (e.g. `"register username"`, `"new message"`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Events a client may send to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Request a username. Valid only while the connection is anonymous.
    #[serde(rename = "register username")]
    RegisterUsername { username: String },

    /// Broadcast a chat message to everyone else.
    #[serde(rename = "new message")]
    NewMessage { message: String },

    /// The user started composing a message.
    #[serde(rename = "typing")]
    Typing,

    /// The user stopped composing without sending.
    #[serde(rename = "stop typing")]
    StopTyping,
}

/// Events the relay may push to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Registration succeeded; sent to the requester only.
    #[serde(rename = "login", rename_all = "camelCase")]
    Login { num_users: usize },

    /// Registration failed; sent to the requester only.
    #[serde(rename = "err")]
    Err { message: String },

    /// Another user registered; sent to everyone but the new user.
    #[serde(rename = "user joined", rename_all = "camelCase")]
    UserJoined { username: String, num_users: usize },

    /// A user disconnected; sent to everyone remaining.
    #[serde(rename = "user left", rename_all = "camelCase")]
    UserLeft { username: String, num_users: usize },

    /// Full snapshot of registered usernames; sent to everyone.
    /// The map is username -> username, the shape the web UI expects.
    #[serde(rename = "online users")]
    OnlineUsers { usernames: HashMap<String, String> },

    /// A chat message from another user.
    #[serde(rename = "new message")]
    NewMessage { username: String, message: String },

    /// Another user started typing.
    #[serde(rename = "typing")]
    Typing { username: String },

    /// Another user stopped typing.
    #[serde(rename = "stop typing")]
    StopTyping { username: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_username_wire_shape() {
        // given:
        let event = ClientEvent::RegisterUsername {
            username: "alice".to_string(),
        };

        // when:
        let value = serde_json::to_value(&event).unwrap();

        // then:
        assert_eq!(
            value,
            json!({"type": "register username", "username": "alice"})
        );
    }

    #[test]
    fn test_typing_events_carry_only_the_tag() {
        // given:
        let typing = ClientEvent::Typing;
        let stop = ClientEvent::StopTyping;

        // when:
        let typing_value = serde_json::to_value(&typing).unwrap();
        let stop_value = serde_json::to_value(&stop).unwrap();

        // then:
        assert_eq!(typing_value, json!({"type": "typing"}));
        assert_eq!(stop_value, json!({"type": "stop typing"}));
    }

    #[test]
    fn test_login_uses_camel_case_num_users() {
        // given:
        let event = ServerEvent::Login { num_users: 3 };

        // when:
        let value = serde_json::to_value(&event).unwrap();

        // then:
        assert_eq!(value, json!({"type": "login", "numUsers": 3}));
    }

    #[test]
    fn test_online_users_maps_name_to_name() {
        // given:
        let mut usernames = HashMap::new();
        usernames.insert("alice".to_string(), "alice".to_string());

        // when:
        let value = serde_json::to_value(&ServerEvent::OnlineUsers { usernames }).unwrap();

        // then:
        assert_eq!(
            value,
            json!({"type": "online users", "usernames": {"alice": "alice"}})
        );
    }

    #[test]
    fn test_new_message_round_trips_through_json() {
        // given:
        let event = ServerEvent::NewMessage {
            username: "bob".to_string(),
            message: "hello".to_string(),
        };

        // when:
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ServerEvent = serde_json::from_str(&json).unwrap();

        // then:
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_unknown_event_type_fails_to_parse() {
        // given:
        let frame = r#"{"type": "kick user", "username": "alice"}"#;

        // when:
        let result = serde_json::from_str::<ClientEvent>(frame);

        // then:
        assert!(result.is_err());
    }
}
