//! Outbound WhatsApp message shaping.
//!
//! This crate provides:
//! - Phone number / group id normalization into JIDs
//! - Per-type message requests with validation (text, media, polls, ...)
//! - A [`Messenger`] that resolves sessions and forwards payloads
//!
//! The connection itself lives behind the [`session::WaSession`] trait,
//! supplied by whatever library owns the WhatsApp socket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   get_session   ┌──────────────────┐
//! │  Messenger   │ ──────────────▶ │ SessionRegistry  │
//! │              │                 └──────────────────┘
//! │ resolve JID  │                          │
//! │ validate     │                          ▼
//! │              │  send_message   ┌──────────────────┐
//! │              │ ──────────────▶ │    WaSession     │
//! └──────────────┘                 │ (injected lib)   │
//!                                  └──────────────────┘
//! ```

mod error;
mod jid;
mod types;

pub mod config;
pub mod content;
pub mod media;
pub mod messenger;
pub mod registry;
pub mod request;
pub mod session;

pub use config::MessagingConfig;
pub use content::MessageContent;
pub use error::{Error, Result};
pub use jid::{GROUP_SERVER, Jid, USER_SERVER, phone_to_jid};
pub use media::MediaSource;
pub use messenger::Messenger;
pub use registry::InMemorySessionRegistry;
pub use types::{MessageKey, Presence, SendOptions, SentMessage, Target};
