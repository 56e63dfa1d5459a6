//! Caller-facing message requests and their validation.
//!
//! Each request carries a raw [`Target`], the type-specific fields, and an
//! optional quoted message. Fields a caller may omit are `Option`s so that
//! requests deserialized from JSON report the missing field instead of
//! failing to parse.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::content::{MessageContent, vcard};
use crate::media::{self, MediaSource, STICKER_MIMETYPE, VOICE_NOTE_MIMETYPE};
use crate::{Error, Jid, MessageKey, Result, SendOptions, Target, phone_to_jid};

/// Most options a poll may offer.
pub const MAX_POLL_OPTIONS: usize = 12;

/// A request that turns into a single `send_message` call.
pub trait Outgoing {
    /// Raw recipient of the message.
    fn target(&self) -> &Target;

    /// Options forwarded alongside the payload.
    fn options(&self) -> SendOptions {
        SendOptions::default()
    }

    /// Validate the request and build its payload for `jid`.
    fn into_content(self, jid: &Jid) -> Result<MessageContent>;
}

fn require_text(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingField(field))
}

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Body; must contain a non-whitespace character.
    #[serde(default)]
    pub text: Option<String>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl TextMessage {
    /// Create a text message for `target`.
    pub fn new(target: Target, text: impl Into<String>) -> Self {
        Self {
            target,
            text: Some(text.into()),
            quoted: None,
        }
    }

    /// Reply to an existing message.
    pub fn quote(mut self, key: MessageKey) -> Self {
        self.quoted = Some(key);
        self
    }
}

impl Outgoing for TextMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        // Whitespace is preserved; only an absent or blank text is rejected.
        let text = require_text(self.text, "text")?;
        Ok(MessageContent::Text { text })
    }
}

/// Image with optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Where the media bytes come from.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// Text shown under the media.
    #[serde(default)]
    pub caption: Option<String>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl ImageMessage {
    /// Create an image message without a caption.
    pub fn new(target: Target, media: MediaSource) -> Self {
        Self {
            target,
            media: Some(media),
            caption: None,
            quoted: None,
        }
    }

    /// Set the caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl Outgoing for ImageMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        Ok(MessageContent::Image {
            media: media::require(self.media, "image")?,
            caption: self.caption,
        })
    }
}

/// Video with optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Where the media bytes come from.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// Text shown under the media.
    #[serde(default)]
    pub caption: Option<String>,
    /// Loop silently like a GIF.
    #[serde(default)]
    pub gif_playback: bool,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl VideoMessage {
    /// Create a video message without a caption.
    pub fn new(target: Target, media: MediaSource) -> Self {
        Self {
            target,
            media: Some(media),
            caption: None,
            gif_playback: false,
            quoted: None,
        }
    }

    /// Set the caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Play the video back as a looping GIF.
    pub fn gif(mut self) -> Self {
        self.gif_playback = true;
        self
    }
}

impl Outgoing for VideoMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        Ok(MessageContent::Video {
            media: media::require(self.media, "video")?,
            caption: self.caption,
            gif_playback: self.gif_playback,
        })
    }
}

/// File attachment. The MIME type is derived from `file_name` unless given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Where the media bytes come from.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// Name shown to the recipient; its extension picks the MIME type.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Explicit MIME type, overriding the extension lookup.
    #[serde(default)]
    pub mimetype: Option<String>,
    /// Text shown under the media.
    #[serde(default)]
    pub caption: Option<String>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl DocumentMessage {
    /// Create a document message named `file_name`.
    pub fn new(target: Target, media: MediaSource, file_name: impl Into<String>) -> Self {
        Self {
            target,
            media: Some(media),
            file_name: Some(file_name.into()),
            mimetype: None,
            caption: None,
            quoted: None,
        }
    }

    /// Override the MIME type instead of deriving it from the extension.
    pub fn mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Set the caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl Outgoing for DocumentMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        let media = media::require(self.media, "document")?;
        let file_name = require_text(self.file_name, "file_name")?;
        let mimetype = match self.mimetype.filter(|m| !m.trim().is_empty()) {
            Some(mimetype) => mimetype,
            None => media::mime_for_document(&file_name)?.to_string(),
        };
        Ok(MessageContent::Document {
            media,
            file_name,
            mimetype,
            caption: self.caption,
        })
    }
}

/// Push-to-talk audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceNoteMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Where the media bytes come from.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl VoiceNoteMessage {
    /// Create a voice note from an Ogg/Opus source.
    pub fn new(target: Target, media: MediaSource) -> Self {
        Self {
            target,
            media: Some(media),
            quoted: None,
        }
    }
}

impl Outgoing for VoiceNoteMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        Ok(MessageContent::Audio {
            media: media::require(self.media, "voice note")?,
            mimetype: VOICE_NOTE_MIMETYPE.to_string(),
            ptt: true,
        })
    }
}

/// WebP sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Where the media bytes come from.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl StickerMessage {
    /// Create a sticker from a WebP source.
    pub fn new(target: Target, media: MediaSource) -> Self {
        Self {
            target,
            media: Some(media),
            quoted: None,
        }
    }
}

impl Outgoing for StickerMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        Ok(MessageContent::Sticker {
            media: media::require(self.media, "sticker")?,
            mimetype: STICKER_MIMETYPE.to_string(),
        })
    }
}

/// Poll with between two and [`MAX_POLL_OPTIONS`] distinct options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Question shown above the options.
    #[serde(default)]
    pub name: Option<String>,
    /// Answers to choose from, in display order.
    #[serde(default)]
    pub options: Vec<String>,
    /// Answers each voter may pick; defaults to 1.
    #[serde(default)]
    pub selectable_count: Option<u8>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl PollMessage {
    /// Create a single-choice poll.
    pub fn new<I, S>(target: Target, name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target,
            name: Some(name.into()),
            options: options.into_iter().map(Into::into).collect(),
            selectable_count: None,
            quoted: None,
        }
    }

    /// Allow each voter to pick up to `count` options.
    pub fn selectable_count(mut self, count: u8) -> Self {
        self.selectable_count = Some(count);
        self
    }

    fn validate_options(&self) -> Result<u8> {
        let count = self.options.len();
        if count < 2 {
            return Err(Error::InvalidPoll(format!(
                "at least 2 options are required, got {count}"
            )));
        }
        if count > MAX_POLL_OPTIONS {
            return Err(Error::InvalidPoll(format!(
                "at most {MAX_POLL_OPTIONS} options are allowed, got {count}"
            )));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(Error::InvalidPoll("options must not be blank".to_string()));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.trim()) {
                return Err(Error::InvalidPoll(format!("duplicate option {option:?}")));
            }
        }

        let selectable = self.selectable_count.unwrap_or(1);
        if selectable == 0 || usize::from(selectable) > count {
            return Err(Error::InvalidPoll(format!(
                "selectable count must be between 1 and {count}, got {selectable}"
            )));
        }
        Ok(selectable)
    }
}

impl Outgoing for PollMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        let selectable_count = self.validate_options()?;
        let name = require_text(self.name, "name")?;
        Ok(MessageContent::Poll {
            name,
            values: self.options,
            selectable_count,
        })
    }
}

/// Map pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Degrees in `[-90, 90]`.
    pub latitude: f64,
    /// Degrees in `[-180, 180]`.
    pub longitude: f64,
    /// Place name shown on the pin.
    #[serde(default)]
    pub name: Option<String>,
    /// Street address shown under the name.
    #[serde(default)]
    pub address: Option<String>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl LocationMessage {
    /// Create a location pin without a name or address.
    pub fn new(target: Target, latitude: f64, longitude: f64) -> Self {
        Self {
            target,
            latitude,
            longitude,
            name: None,
            address: None,
            quoted: None,
        }
    }

    /// Set the place name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the street address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Outgoing for LocationMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidLocation(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(MessageContent::Location {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name,
            address: self.address,
        })
    }
}

/// Contact card for a single phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// Name written to the card's `FN` property.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Phone number; only its digits are kept.
    #[serde(default)]
    pub phone: Option<String>,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl ContactMessage {
    /// Create a contact card for `phone`.
    pub fn new(target: Target, display_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            target,
            display_name: Some(display_name.into()),
            phone: Some(phone.into()),
            quoted: None,
        }
    }
}

impl Outgoing for ContactMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, _jid: &Jid) -> Result<MessageContent> {
        let display_name = require_text(self.display_name, "display_name")?;
        let phone = self
            .phone
            .filter(|p| p.chars().any(|c| c.is_ascii_digit()))
            .ok_or(Error::MissingField("phone"))?;
        Ok(MessageContent::Contact {
            vcard: vcard(&display_name, &phone),
            display_name,
        })
    }
}

/// Emoji reaction to a message in the target chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionMessage {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// ID of the message reacted to.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Whether the reacted message was sent by this session.
    #[serde(default)]
    pub from_me: bool,
    /// Author of the reacted message in a group.
    #[serde(default)]
    pub participant: Option<String>,
    /// Emoji to react with; empty removes an earlier reaction.
    #[serde(default)]
    pub emoji: String,
    /// Message this one replies to.
    #[serde(default)]
    pub quoted: Option<MessageKey>,
}

impl ReactionMessage {
    /// React to message `message_id` received in the target chat.
    pub fn new(target: Target, message_id: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            target,
            message_id: Some(message_id.into()),
            from_me: false,
            participant: None,
            emoji: emoji.into(),
            quoted: None,
        }
    }

    /// React to a message this session sent.
    pub fn own(mut self) -> Self {
        self.from_me = true;
        self
    }

    /// Set the group member who wrote the reacted message.
    pub fn participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    /// Quote an existing message alongside the reaction.
    pub fn quote(mut self, key: MessageKey) -> Self {
        self.quoted = Some(key);
        self
    }
}

impl Outgoing for ReactionMessage {
    fn target(&self) -> &Target {
        &self.target
    }

    fn options(&self) -> SendOptions {
        SendOptions::quoting(self.quoted.clone())
    }

    fn into_content(self, jid: &Jid) -> Result<MessageContent> {
        let id = require_text(self.message_id, "message_id")?;
        let participant = self
            .participant
            .map(|p| phone_to_jid(&p, false))
            .transpose()?;
        Ok(MessageContent::Reaction {
            key: MessageKey {
                remote_jid: jid.clone(),
                id,
                from_me: self.from_me,
                participant,
            },
            text: self.emoji,
        })
    }
}

/// Marks a received message as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    /// Raw recipient, normalized to a JID at send time.
    #[serde(flatten)]
    pub target: Target,
    /// ID of the message to mark read.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Author of the message in a group.
    #[serde(default)]
    pub participant: Option<String>,
}

impl ReadReceipt {
    /// Mark message `message_id` from the target chat as read.
    pub fn new(target: Target, message_id: impl Into<String>) -> Self {
        Self {
            target,
            message_id: Some(message_id.into()),
            participant: None,
        }
    }

    /// Set the group member who wrote the message.
    pub fn participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    /// Validate and build the key of the message to mark read in `jid`.
    pub fn into_key(self, jid: Jid) -> Result<MessageKey> {
        let id = require_text(self.message_id, "message_id")?;
        let participant = self
            .participant
            .map(|p| phone_to_jid(&p, false))
            .transpose()?;
        Ok(MessageKey {
            remote_jid: jid,
            id,
            from_me: false,
            participant,
        })
    }
}
