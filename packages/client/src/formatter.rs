//! Formatting of incoming relay events for terminal display.

use std::collections::HashMap;

use banter_shared::time::now_clock;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the online-users snapshot, marking the current user.
    pub fn format_online_users(usernames: &HashMap<String, String>, me: &str) -> String {
        let mut names: Vec<&str> = usernames.keys().map(String::as_str).collect();
        // Sort for consistent ordering
        names.sort_unstable();

        let mut output = String::new();
        output.push_str("\n--- online users ---\n");
        if names.is_empty() {
            output.push_str("(nobody)\n");
        } else {
            for name in names {
                let me_suffix = if name == me { " (me)" } else { "" };
                output.push_str(&format!("  {}{}\n", name, me_suffix));
            }
        }
        output.push_str("--------------------\n");
        output
    }

    /// Format a join notification
    pub fn format_user_joined(username: &str, num_users: usize) -> String {
        format!("\n+ {} joined ({} online)\n", username, num_users)
    }

    /// Format a leave notification
    pub fn format_user_left(username: &str, num_users: usize) -> String {
        format!("\n- {} left ({} online)\n", username, num_users)
    }

    /// Format a chat message with the local receive time
    pub fn format_chat_message(username: &str, message: &str) -> String {
        format!("\n[{}] {}: {}\n", now_clock(), username, message)
    }

    /// Format a typing notice. There is no matching stop-typing output:
    /// lines already printed to a terminal cannot be retracted.
    pub fn format_typing(username: &str) -> String {
        format!("\n* {} is typing...\n", username)
    }

    /// Format the post-registration welcome line
    pub fn format_welcome(username: &str, num_users: usize) -> String {
        format!(
            "\nWelcome, {}! {} user(s) online. Type a message and press Enter to send. Ctrl+C to exit.\n",
            username, num_users
        )
    }
}
