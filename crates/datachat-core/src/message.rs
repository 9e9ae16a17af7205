//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, server metadata and the transient loading placeholder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed (or picked) by the visitor.
    User,
    /// Message produced by the engine or the backend.
    Assistant,
}

/// Whether a message is final or a loading placeholder awaiting a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Final,
    Loading,
}

/// Extra data the backend attached to an answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A single message in the conversation.
///
/// Messages are immutable once appended; the only in-place mutation is an
/// explicit answer edit, which keeps `id` and `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_meta: Option<ServerMeta>,
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    fn new(role: MessageRole, text: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
            server_meta: None,
            status,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text, MessageStatus::Final)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text, MessageStatus::Final)
    }

    /// The transient "thinking" bubble shown while a query is in flight.
    pub fn loading() -> Self {
        Self::new(MessageRole::Assistant, LOADING_TEXT, MessageStatus::Loading)
    }

    pub fn with_meta(mut self, meta: ServerMeta) -> Self {
        self.server_meta = Some(meta);
        self
    }

    pub fn is_loading(&self) -> bool {
        self.status == MessageStatus::Loading
    }

    pub fn numeric_value(&self) -> Option<&serde_json::Value> {
        self.server_meta.as_ref()?.numeric_value.as_ref()
    }
}

pub const LOADING_TEXT: &str = "Thinking...";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_placeholder_is_assistant() {
        let msg = Message::loading();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.is_loading());
        assert!(!Message::assistant("hi").is_loading());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }

    #[test]
    fn serializes_role_lowercase() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["status"], "final");
        assert!(json.get("server_meta").is_none());
    }
}
