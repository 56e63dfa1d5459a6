//! Dry-run session that prints payloads instead of sending them.

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use wasend_core::session::WaSession;
use wasend_core::{
    Error, Jid, MessageContent, MessageKey, Presence, Result, SendOptions, SentMessage,
};

/// One recorded session call.
#[derive(Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
enum Record<'a> {
    SendMessage {
        jid: &'a Jid,
        content: &'a MessageContent,
        options: &'a SendOptions,
    },
    SendPresenceUpdate {
        jid: &'a Jid,
        presence: Presence,
    },
    ReadMessages {
        keys: &'a [MessageKey],
    },
}

/// Session that writes every call as JSON and returns synthetic receipts.
pub struct DryRunSession {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Default for DryRunSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunSession {
    /// Create a session that prints each call to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a session that writes each call to `out`.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn emit(&self, record: Record<'_>) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::Transport("dry-run output lock poisoned".to_string()))?;
        serde_json::to_writer_pretty(&mut *out, &record)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl WaSession for DryRunSession {
    async fn send_message(
        &self,
        jid: &Jid,
        content: MessageContent,
        options: SendOptions,
    ) -> Result<SentMessage> {
        info!(%jid, kind = content.kind(), "dry run: send_message");
        self.emit(Record::SendMessage {
            jid,
            content: &content,
            options: &options,
        })?;

        Ok(SentMessage {
            key: MessageKey {
                remote_jid: jid.clone(),
                id: Uuid::new_v4().simple().to_string().to_uppercase(),
                from_me: true,
                participant: None,
            },
            timestamp: Utc::now(),
        })
    }

    async fn send_presence_update(&self, presence: Presence, jid: &Jid) -> Result<()> {
        info!(%jid, ?presence, "dry run: send_presence_update");
        self.emit(Record::SendPresenceUpdate { jid, presence })
    }

    async fn read_messages(&self, keys: Vec<MessageKey>) -> Result<()> {
        info!(count = keys.len(), "dry run: read_messages");
        self.emit(Record::ReadMessages { keys: &keys })
    }
}
