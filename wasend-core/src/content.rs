//! Message payloads handed to a session.

use serde::{Deserialize, Serialize};

use crate::MessageKey;
use crate::media::MediaSource;

/// Payload of a single outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text.
    Text { text: String },
    /// Image with optional caption.
    Image {
        media: MediaSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Video with optional caption, optionally played back as a GIF.
    Video {
        media: MediaSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default)]
        gif_playback: bool,
    },
    /// File attachment.
    Document {
        media: MediaSource,
        file_name: String,
        mimetype: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    /// Audio; `ptt` renders it as a voice note.
    Audio {
        media: MediaSource,
        mimetype: String,
        ptt: bool,
    },
    /// Sticker image.
    Sticker { media: MediaSource, mimetype: String },
    /// Poll with `selectable_count` answers allowed per voter.
    Poll {
        name: String,
        values: Vec<String>,
        selectable_count: u8,
    },
    /// Pinned map location.
    Location {
        latitude: f64,
        longitude: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
    /// Shared contact card.
    Contact { display_name: String, vcard: String },
    /// Emoji reaction to an existing message; empty `text` removes it.
    Reaction { key: MessageKey, text: String },
}

impl MessageContent {
    /// Short name of the payload type, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Document { .. } => "document",
            Self::Audio { ptt: true, .. } => "voice_note",
            Self::Audio { .. } => "audio",
            Self::Sticker { .. } => "sticker",
            Self::Poll { .. } => "poll",
            Self::Location { .. } => "location",
            Self::Contact { .. } => "contact",
            Self::Reaction { .. } => "reaction",
        }
    }
}

/// Build a vCard 3.0 for a single contact.
///
/// The `waid` parameter lets WhatsApp link the card to an account. The
/// display name is escaped so it always stays a single `FN` value.
pub fn vcard(display_name: &str, phone: &str) -> String {
    let waid: String = phone.chars().filter(char::is_ascii_digit).collect();
    let name = escape_text(display_name);
    format!(
        "BEGIN:VCARD\nVERSION:3.0\nFN:{name}\nTEL;type=CELL;type=VOICE;waid={waid}:+{waid}\nEND:VCARD"
    )
}

/// Escape a vCard text value: backslash, comma, semicolon and line breaks.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
