//! Session capabilities consumed from the messaging library.
//!
//! The [`WaSession`] trait is the whole boundary between this crate and the
//! library that owns the connection. Connection setup, pairing, encryption
//! and retries all happen behind it.
//!
//! # Example Implementation
//!
//! ```ignore
//! use async_trait::async_trait;
//! use wasend_core::{Jid, MessageContent, MessageKey, Presence, Result, SendOptions, SentMessage};
//! use wasend_core::session::WaSession;
//!
//! struct BridgeSession { /* handle to a connected client */ }
//!
//! #[async_trait]
//! impl WaSession for BridgeSession {
//!     async fn send_message(&self, jid: &Jid, content: MessageContent, options: SendOptions) -> Result<SentMessage> {
//!         // Forward to the client
//!     }
//!
//!     async fn send_presence_update(&self, presence: Presence, jid: &Jid) -> Result<()> {
//!         // Forward to the client
//!     }
//!
//!     async fn read_messages(&self, keys: Vec<MessageKey>) -> Result<()> {
//!         // Forward to the client
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Jid, MessageContent, MessageKey, Presence, Result, SendOptions, SentMessage};

/// An established, authenticated WhatsApp session.
///
/// Implementations report network failures as [`Error::Transport`](crate::Error::Transport).
#[async_trait]
pub trait WaSession: Send + Sync {
    /// Hand a single message to the network.
    async fn send_message(
        &self,
        jid: &Jid,
        content: MessageContent,
        options: SendOptions,
    ) -> Result<SentMessage>;

    /// Update the chat presence shown to `jid`.
    async fn send_presence_update(&self, presence: Presence, jid: &Jid) -> Result<()>;

    /// Send read receipts for the given messages.
    async fn read_messages(&self, keys: Vec<MessageKey>) -> Result<()>;
}

/// Lookup of established sessions by id.
///
/// The registry owns session lifecycle; callers only borrow a handle.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Get the session registered under `session_id`, if any.
    async fn get_session(&self, session_id: &str) -> Option<Arc<dyn WaSession>>;
}
