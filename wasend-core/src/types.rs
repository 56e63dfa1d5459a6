//! Core types shared by requests, sessions and receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Jid;

/// Recipient as supplied by a caller: a phone number, group id or JID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Phone number, group id, or a full JID.
    pub to: String,
    /// Whether `to` names a group.
    #[serde(default)]
    pub is_group: bool,
}

impl Target {
    /// Target an individual phone number.
    pub fn phone(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            is_group: false,
        }
    }

    /// Target a group id.
    pub fn group(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            is_group: true,
        }
    }
}

/// Identifies a single message within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageKey {
    /// Chat the message belongs to.
    pub remote_jid: Jid,
    /// Message id assigned by the sender.
    pub id: String,
    /// Whether the message was sent by this session.
    #[serde(default)]
    pub from_me: bool,
    /// Author of the message inside a group chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<Jid>,
}

impl MessageKey {
    /// Key for a message received in `remote_jid`.
    pub fn incoming(remote_jid: Jid, id: impl Into<String>) -> Self {
        Self {
            remote_jid,
            id: id.into(),
            from_me: false,
            participant: None,
        }
    }

    /// Set the group participant who authored the message.
    pub fn participant(mut self, participant: Jid) -> Self {
        self.participant = Some(participant);
        self
    }
}

/// Chat presence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Online.
    Available,
    /// Offline.
    Unavailable,
    /// Typing a message.
    Composing,
    /// Recording a voice note.
    Recording,
    /// Stopped typing.
    Paused,
}

/// Per-send options forwarded to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Message being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<MessageKey>,
}

impl SendOptions {
    /// Options that quote `key`, or no options when `key` is absent.
    pub fn quoting(key: Option<MessageKey>) -> Self {
        Self { quoted: key }
    }
}

/// Receipt returned by a session after a message is handed to the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Key of the sent message.
    pub key: MessageKey,
    /// When the session accepted the message.
    pub timestamp: DateTime<Utc>,
}
