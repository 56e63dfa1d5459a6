//! Outbound message operations.
//!
//! Every operation follows the same path: resolve the session by id,
//! normalize the target into a JID, validate the request, then make one
//! call on the session. Typing makes two presence calls around a wait.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::MessagingConfig;
use crate::jid::localize;
use crate::request::{
    ContactMessage, DocumentMessage, ImageMessage, LocationMessage, Outgoing, PollMessage,
    ReactionMessage, ReadReceipt, StickerMessage, TextMessage, VideoMessage, VoiceNoteMessage,
};
use crate::session::{SessionRegistry, WaSession};
use crate::{Error, Jid, Presence, Result, SentMessage, Target, phone_to_jid};

/// Sends messages through sessions looked up in a [`SessionRegistry`].
#[derive(Clone)]
pub struct Messenger {
    registry: Arc<dyn SessionRegistry>,
    config: MessagingConfig,
}

impl Messenger {
    /// Create a messenger with default configuration.
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self {
            registry,
            config: MessagingConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MessagingConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    async fn session(&self, session_id: &str) -> Result<Arc<dyn WaSession>> {
        match self.registry.get_session(session_id).await {
            Some(session) => Ok(session),
            None => {
                warn!(session_id, "session not found");
                Err(Error::SessionNotFound(session_id.to_string()))
            }
        }
    }

    /// Normalize a target into a JID, applying the configured country code.
    pub fn resolve(&self, target: &Target) -> Result<Jid> {
        match (&self.config.default_country_code, target.is_group) {
            (Some(code), false) => phone_to_jid(&localize(&target.to, code), false),
            _ => phone_to_jid(&target.to, target.is_group),
        }
    }

    /// Validate and send any [`Outgoing`] request.
    pub async fn send<M: Outgoing>(&self, session_id: &str, message: M) -> Result<SentMessage> {
        let session = self.session(session_id).await?;
        let jid = self.resolve(message.target())?;
        let options = message.options();
        let content = message.into_content(&jid)?;

        debug!(session_id, %jid, kind = content.kind(), "sending message");
        session.send_message(&jid, content, options).await
    }

    pub async fn send_text(&self, session_id: &str, message: TextMessage) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_image(&self, session_id: &str, message: ImageMessage) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_video(&self, session_id: &str, message: VideoMessage) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_document(
        &self,
        session_id: &str,
        message: DocumentMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_voice_note(
        &self,
        session_id: &str,
        message: VoiceNoteMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_sticker(
        &self,
        session_id: &str,
        message: StickerMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_poll(&self, session_id: &str, message: PollMessage) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_location(
        &self,
        session_id: &str,
        message: LocationMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_contact(
        &self,
        session_id: &str,
        message: ContactMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    pub async fn send_reaction(
        &self,
        session_id: &str,
        message: ReactionMessage,
    ) -> Result<SentMessage> {
        self.send(session_id, message).await
    }

    /// Show the typing indicator to `target` for `duration`, then go back to available.
    ///
    /// Uses the configured typing duration when `duration` is `None`. If the
    /// `composing` update fails, the wait and the `available` update are skipped.
    pub async fn send_typing(
        &self,
        session_id: &str,
        target: &Target,
        duration: Option<Duration>,
    ) -> Result<()> {
        let session = self.session(session_id).await?;
        let jid = self.resolve(target)?;
        let duration = duration.unwrap_or_else(|| self.config.typing_duration());

        debug!(session_id, %jid, kind = "typing", ?duration, "sending presence");
        session.send_presence_update(Presence::Composing, &jid).await?;
        tokio::time::sleep(duration).await;
        session.send_presence_update(Presence::Available, &jid).await
    }

    /// Mark a received message as read.
    pub async fn read_message(&self, session_id: &str, receipt: ReadReceipt) -> Result<()> {
        let session = self.session(session_id).await?;
        let jid = self.resolve(&receipt.target)?;
        let key = receipt.into_key(jid)?;

        debug!(session_id, jid = %key.remote_jid, kind = "read", id = %key.id, "marking read");
        session.read_messages(vec![key]).await
    }
}
