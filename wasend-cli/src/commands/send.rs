//! Message commands
//!
//! Each subcommand builds one request and hands it to the messenger.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;
use wasend_core::request::{
    ContactMessage, DocumentMessage, ImageMessage, LocationMessage, PollMessage, ReactionMessage,
    ReadReceipt, StickerMessage, TextMessage, VideoMessage, VoiceNoteMessage,
};
use wasend_core::{MediaSource, Messenger, SentMessage, Target};

/// Recipient arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Phone number, group id, or full JID
    #[arg(long)]
    pub to: String,

    /// Treat --to as a group id
    #[arg(long)]
    pub group: bool,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Self {
            to: args.to,
            is_group: args.group,
        }
    }
}

/// Message subcommands
#[derive(Subcommand, Debug)]
pub enum SendCommand {
    /// Send a text message
    Text {
        #[command(flatten)]
        target: TargetArgs,
        /// Message text
        #[arg(long)]
        text: String,
    },
    /// Send an image
    Image {
        #[command(flatten)]
        target: TargetArgs,
        /// URL or file path
        #[arg(long)]
        media: String,
        #[arg(long)]
        caption: Option<String>,
    },
    /// Send a video
    Video {
        #[command(flatten)]
        target: TargetArgs,
        /// URL or file path
        #[arg(long)]
        media: String,
        #[arg(long)]
        caption: Option<String>,
        /// Play back as a looping GIF
        #[arg(long)]
        gif: bool,
    },
    /// Send a document
    Document {
        #[command(flatten)]
        target: TargetArgs,
        /// URL or file path
        #[arg(long)]
        media: String,
        /// File name shown to the recipient; its extension picks the MIME type
        #[arg(long)]
        file_name: String,
        /// Explicit MIME type
        #[arg(long)]
        mimetype: Option<String>,
        #[arg(long)]
        caption: Option<String>,
    },
    /// Send a voice note
    Voice {
        #[command(flatten)]
        target: TargetArgs,
        /// URL or file path of an OGG/Opus file
        #[arg(long)]
        media: String,
    },
    /// Send a sticker
    Sticker {
        #[command(flatten)]
        target: TargetArgs,
        /// URL or file path of a WebP image
        #[arg(long)]
        media: String,
    },
    /// Send a poll
    Poll {
        #[command(flatten)]
        target: TargetArgs,
        /// Poll question
        #[arg(long)]
        name: String,
        /// Poll option (repeat for each option)
        #[arg(long = "option")]
        options: Vec<String>,
        /// Answers each voter may pick
        #[arg(long)]
        selectable: Option<u8>,
    },
    /// Send a location pin
    Location {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Send a contact card
    Contact {
        #[command(flatten)]
        target: TargetArgs,
        /// Contact display name
        #[arg(long)]
        name: String,
        /// Contact phone number
        #[arg(long)]
        phone: String,
    },
    /// React to a message
    React {
        #[command(flatten)]
        target: TargetArgs,
        /// Id of the message to react to
        #[arg(long)]
        id: String,
        /// Emoji; empty removes the reaction
        #[arg(long, default_value = "")]
        emoji: String,
    },
    /// Show the typing indicator
    Typing {
        #[command(flatten)]
        target: TargetArgs,
        /// How long to type, in milliseconds
        #[arg(long)]
        ms: Option<u64>,
    },
    /// Mark a message as read
    Read {
        #[command(flatten)]
        target: TargetArgs,
        /// Id of the message to mark read
        #[arg(long)]
        id: String,
        /// Author of the message in a group
        #[arg(long)]
        participant: Option<String>,
    },
}

/// Run a message command against `session_id`
pub async fn run(messenger: &Messenger, session_id: &str, command: SendCommand) -> Result<()> {
    let sent = match command {
        SendCommand::Text { target, text } => {
            messenger
                .send_text(session_id, TextMessage::new(target.into(), text))
                .await?
        }
        SendCommand::Image {
            target,
            media,
            caption,
        } => {
            let mut message = ImageMessage::new(target.into(), MediaSource::parse(&media));
            message.caption = caption;
            messenger.send_image(session_id, message).await?
        }
        SendCommand::Video {
            target,
            media,
            caption,
            gif,
        } => {
            let mut message = VideoMessage::new(target.into(), MediaSource::parse(&media));
            message.caption = caption;
            message.gif_playback = gif;
            messenger.send_video(session_id, message).await?
        }
        SendCommand::Document {
            target,
            media,
            file_name,
            mimetype,
            caption,
        } => {
            let mut message =
                DocumentMessage::new(target.into(), MediaSource::parse(&media), file_name);
            message.mimetype = mimetype;
            message.caption = caption;
            messenger.send_document(session_id, message).await?
        }
        SendCommand::Voice { target, media } => {
            messenger
                .send_voice_note(
                    session_id,
                    VoiceNoteMessage::new(target.into(), MediaSource::parse(&media)),
                )
                .await?
        }
        SendCommand::Sticker { target, media } => {
            messenger
                .send_sticker(
                    session_id,
                    StickerMessage::new(target.into(), MediaSource::parse(&media)),
                )
                .await?
        }
        SendCommand::Poll {
            target,
            name,
            options,
            selectable,
        } => {
            let mut message = PollMessage::new(target.into(), name, options);
            message.selectable_count = selectable;
            messenger.send_poll(session_id, message).await?
        }
        SendCommand::Location {
            target,
            lat,
            lng,
            name,
            address,
        } => {
            let mut message = LocationMessage::new(target.into(), lat, lng);
            message.name = name;
            message.address = address;
            messenger.send_location(session_id, message).await?
        }
        SendCommand::Contact {
            target,
            name,
            phone,
        } => {
            messenger
                .send_contact(session_id, ContactMessage::new(target.into(), name, phone))
                .await?
        }
        SendCommand::React { target, id, emoji } => {
            messenger
                .send_reaction(session_id, ReactionMessage::new(target.into(), id, emoji))
                .await?
        }
        SendCommand::Typing { target, ms } => {
            let target: Target = target.into();
            messenger
                .send_typing(session_id, &target, ms.map(Duration::from_millis))
                .await?;
            return Ok(());
        }
        SendCommand::Read {
            target,
            id,
            participant,
        } => {
            let mut receipt = ReadReceipt::new(target.into(), id);
            receipt.participant = participant;
            messenger.read_message(session_id, receipt).await?;
            return Ok(());
        }
    };

    report(&sent);
    Ok(())
}

fn report(sent: &SentMessage) {
    info!(id = %sent.key.id, jid = %sent.key.remote_jid, "message accepted");
    println!("Sent {} to {} at {}", sent.key.id, sent.key.remote_jid, sent.timestamp);
}
