//! End-to-end tests for Messenger against a recording session
//!
//! These tests check the shared lookup path of every operation:
//! - Unknown session ids fail the same way everywhere
//! - Media operations reject missing media
//! - Payloads and options reach the session unchanged
//! - The typing indicator brackets the requested delay

use std::sync::atomic::{AtomicUsize, Ordering};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;
use tracing_subscriber::fmt::MakeWriter;

use wasend_core::request::{
    ContactMessage, DocumentMessage, ImageMessage, LocationMessage, PollMessage, ReactionMessage,
    ReadReceipt, StickerMessage, TextMessage, VideoMessage, VoiceNoteMessage,
};
use wasend_core::session::WaSession;
use wasend_core::{
    Error, InMemorySessionRegistry, Jid, MediaSource, MessageContent, MessageKey, MessagingConfig,
    Messenger, Presence, Result, SendOptions, SentMessage, Target,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Send {
        jid: Jid,
        content: MessageContent,
        options: SendOptions,
    },
    Presence {
        presence: Presence,
        jid: Jid,
        at: Instant,
    },
    Read {
        keys: Vec<MessageKey>,
    },
}

/// Session that records every call and optionally fails sends
#[derive(Default)]
struct RecordingSession {
    calls: Mutex<Vec<Call>>,
    fail_with: Option<String>,
    reject_first_presence: bool,
    presence_attempts: AtomicUsize,
}

impl RecordingSession {
    fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Fails only the first presence update; everything else succeeds.
    fn rejecting_first_presence() -> Self {
        Self {
            reject_first_presence: true,
            ..Default::default()
        }
    }

    fn presence_attempts(&self) -> usize {
        self.presence_attempts.load(Ordering::SeqCst)
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        match &self.fail_with {
            Some(reason) => Err(Error::Transport(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WaSession for RecordingSession {
    async fn send_message(
        &self,
        jid: &Jid,
        content: MessageContent,
        options: SendOptions,
    ) -> Result<SentMessage> {
        self.check()?;
        self.calls.lock().unwrap().push(Call::Send {
            jid: jid.clone(),
            content,
            options,
        });
        Ok(SentMessage {
            key: MessageKey {
                remote_jid: jid.clone(),
                id: "3EB0TEST".to_string(),
                from_me: true,
                participant: None,
            },
            timestamp: Utc::now(),
        })
    }

    async fn send_presence_update(&self, presence: Presence, jid: &Jid) -> Result<()> {
        let attempt = self.presence_attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject_first_presence && attempt == 0 {
            return Err(Error::Transport("presence rejected".to_string()));
        }
        self.check()?;
        self.calls.lock().unwrap().push(Call::Presence {
            presence,
            jid: jid.clone(),
            at: Instant::now(),
        });
        Ok(())
    }

    async fn read_messages(&self, keys: Vec<MessageKey>) -> Result<()> {
        self.check()?;
        self.calls.lock().unwrap().push(Call::Read { keys });
        Ok(())
    }
}

async fn setup() -> (Messenger, Arc<RecordingSession>) {
    let session = Arc::new(RecordingSession::default());
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry.insert("main", session.clone()).await;
    (Messenger::new(registry), session)
}

fn url(s: &str) -> MediaSource {
    MediaSource::Url(s.to_string())
}

fn only_send(session: &RecordingSession) -> (Jid, MessageContent, SendOptions) {
    let calls = session.calls();
    assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
    match calls.into_iter().next() {
        Some(Call::Send {
            jid,
            content,
            options,
        }) => (jid, content, options),
        other => panic!("expected a send, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_session_is_rejected_by_every_operation() {
    let (m, session) = setup().await;
    let to = || Target::phone("5511999887766");
    let media = || url("https://example.com/a");

    let results = vec![
        m.send_text("nope", TextMessage::new(to(), "hi")).await.err(),
        m.send_image("nope", ImageMessage::new(to(), media())).await.err(),
        m.send_video("nope", VideoMessage::new(to(), media())).await.err(),
        m.send_document("nope", DocumentMessage::new(to(), media(), "a.pdf"))
            .await
            .err(),
        m.send_voice_note("nope", VoiceNoteMessage::new(to(), media()))
            .await
            .err(),
        m.send_sticker("nope", StickerMessage::new(to(), media()))
            .await
            .err(),
        m.send_poll("nope", PollMessage::new(to(), "Q", ["a", "b"]))
            .await
            .err(),
        m.send_location("nope", LocationMessage::new(to(), 1.0, 2.0))
            .await
            .err(),
        m.send_contact("nope", ContactMessage::new(to(), "Ana", "55119"))
            .await
            .err(),
        m.send_reaction("nope", ReactionMessage::new(to(), "ID", "👍"))
            .await
            .err(),
    ];
    for err in results {
        assert!(matches!(err, Some(Error::SessionNotFound(ref id)) if id == "nope"));
    }

    let typing = m.send_typing("nope", &to(), Some(Duration::ZERO)).await;
    assert!(matches!(typing, Err(Error::SessionNotFound(_))));

    let read = m.read_message("nope", ReadReceipt::new(to(), "ID")).await;
    assert!(matches!(read, Err(Error::SessionNotFound(_))));

    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn missing_media_is_rejected_by_every_media_operation() {
    let (m, session) = setup().await;
    let to = || Target::phone("5511999887766");

    let mut image = ImageMessage::new(to(), url("x"));
    image.media = None;
    let mut video = VideoMessage::new(to(), url("x"));
    video.media = Some(MediaSource::Bytes(vec![]));
    let mut document = DocumentMessage::new(to(), url("x"), "a.pdf");
    document.media = None;
    let mut voice = VoiceNoteMessage::new(to(), url("x"));
    voice.media = Some(url(""));
    let mut sticker = StickerMessage::new(to(), url("x"));
    sticker.media = None;

    let results = vec![
        m.send_image("main", image).await.err(),
        m.send_video("main", video).await.err(),
        m.send_document("main", document).await.err(),
        m.send_voice_note("main", voice).await.err(),
        m.send_sticker("main", sticker).await.err(),
    ];
    for err in results {
        assert!(matches!(err, Some(Error::MissingMedia(_))), "got {err:?}");
    }
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn text_reaches_session_with_normalized_jid() {
    let (m, session) = setup().await;

    m.send_text("main", TextMessage::new(Target::phone("+55 11 99988-7766"), "Olá"))
        .await
        .unwrap();

    let (jid, content, options) = only_send(&session);
    assert_eq!(jid.as_str(), "5511999887766@s.whatsapp.net");
    assert_eq!(
        content,
        MessageContent::Text {
            text: "Olá".to_string()
        }
    );
    assert_eq!(options, SendOptions::default());
}

#[tokio::test]
async fn quoted_message_is_forwarded_as_option() {
    let (m, session) = setup().await;
    let quoted = MessageKey::incoming(Jid::new("123", "s.whatsapp.net"), "ORIG");

    m.send_text(
        "main",
        TextMessage::new(Target::phone("123"), "reply").quote(quoted.clone()),
    )
    .await
    .unwrap();

    let (_, _, options) = only_send(&session);
    assert_eq!(options.quoted, Some(quoted));
}

#[tokio::test]
async fn group_image_keeps_caption() {
    let (m, session) = setup().await;

    m.send_image(
        "main",
        ImageMessage::new(Target::group("120363001234567890"), url("https://x/cat.jpg"))
            .caption("cat"),
    )
    .await
    .unwrap();

    let (jid, content, _) = only_send(&session);
    assert!(jid.is_group());
    assert_eq!(
        content,
        MessageContent::Image {
            media: url("https://x/cat.jpg"),
            caption: Some("cat".to_string()),
        }
    );
}

#[tokio::test]
async fn sticker_is_sent_as_webp() {
    let (m, session) = setup().await;

    m.send_sticker("main", StickerMessage::new(Target::phone("1"), url("https://x/s")))
        .await
        .unwrap();

    let (_, content, _) = only_send(&session);
    assert!(matches!(content, MessageContent::Sticker { ref mimetype, .. } if mimetype == "image/webp"));
}

#[tokio::test]
async fn invalid_document_extension_is_not_sent() {
    let (m, session) = setup().await;

    let err = m
        .send_document(
            "main",
            DocumentMessage::new(Target::phone("1"), url("https://x/f"), "setup.exe"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedExtension(_)));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn poll_validation_guards_the_session() {
    let (m, session) = setup().await;
    let to = || Target::phone("1");

    let too_few = m
        .send_poll("main", PollMessage::new(to(), "Q", ["only"]))
        .await;
    assert!(matches!(too_few, Err(Error::InvalidPoll(_))));

    let too_many_picks = m
        .send_poll("main", PollMessage::new(to(), "Q", ["a", "b", "c"]).selectable_count(4))
        .await;
    assert!(matches!(too_many_picks, Err(Error::InvalidPoll(_))));

    let no_picks = m
        .send_poll("main", PollMessage::new(to(), "Q", ["a", "b"]).selectable_count(0))
        .await;
    assert!(matches!(no_picks, Err(Error::InvalidPoll(_))));
    assert!(session.calls().is_empty());

    m.send_poll("main", PollMessage::new(to(), "Q", ["a", "b", "c"]).selectable_count(3))
        .await
        .unwrap();
    let (_, content, _) = only_send(&session);
    assert_eq!(
        content,
        MessageContent::Poll {
            name: "Q".to_string(),
            values: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            selectable_count: 3,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn typing_brackets_the_requested_delay() {
    let (m, session) = setup().await;
    let delay = Duration::from_millis(1500);

    m.send_typing("main", &Target::phone("123"), Some(delay))
        .await
        .unwrap();

    let calls = session.calls();
    assert_eq!(calls.len(), 2);
    match (&calls[0], &calls[1]) {
        (
            Call::Presence {
                presence: Presence::Composing,
                jid: first_jid,
                at: start,
            },
            Call::Presence {
                presence: Presence::Available,
                jid: second_jid,
                at: end,
            },
        ) => {
            assert_eq!(first_jid.as_str(), "123@s.whatsapp.net");
            assert_eq!(first_jid, second_jid);
            assert!(end.duration_since(*start) >= delay);
        }
        other => panic!("unexpected presence calls: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn typing_uses_configured_default_delay() {
    let (m, session) = setup().await;
    let m = m.with_config(MessagingConfig::default().with_typing_duration(Duration::from_secs(3)));

    m.send_typing("main", &Target::phone("123"), None)
        .await
        .unwrap();

    let calls = session.calls();
    let [
        Call::Presence { at: start, .. },
        Call::Presence { at: end, .. },
    ] = calls.as_slice()
    else {
        panic!("unexpected calls: {calls:?}");
    };
    assert!(end.duration_since(*start) >= Duration::from_secs(3));
}

#[tokio::test]
async fn read_message_sends_single_key() {
    let (m, session) = setup().await;

    m.read_message(
        "main",
        ReadReceipt::new(Target::group("120363001234567890"), "MSG9").participant("+62 812"),
    )
    .await
    .unwrap();

    assert_eq!(
        session.calls(),
        vec![Call::Read {
            keys: vec![MessageKey {
                remote_jid: Jid::new("120363001234567890", "g.us"),
                id: "MSG9".to_string(),
                from_me: false,
                participant: Some(Jid::new("62812", "s.whatsapp.net")),
            }],
        }]
    );
}

#[tokio::test]
async fn transport_errors_propagate_unchanged() {
    let session = Arc::new(RecordingSession::failing("socket closed"));
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry.insert("main", session.clone()).await;
    let m = Messenger::new(registry);

    let err = m
        .send_text("main", TextMessage::new(Target::phone("1"), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(ref r) if r == "socket closed"));

    let err = m
        .send_typing("main", &Target::phone("1"), Some(Duration::from_secs(60)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test(start_paused = true)]
async fn failed_composing_skips_wait_and_revert() {
    let session = Arc::new(RecordingSession::rejecting_first_presence());
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry.insert("main", session.clone()).await;
    let m = Messenger::new(registry);

    let start = Instant::now();
    let err = m
        .send_typing("main", &Target::phone("1"), Some(Duration::from_secs(60)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(ref r) if r == "presence rejected"));
    assert_eq!(session.presence_attempts(), 1);
    assert!(session.calls().is_empty());
    assert_eq!(Instant::now(), start);
}

#[tokio::test]
async fn contact_name_with_line_breaks_stays_one_card() {
    let (m, session) = setup().await;

    m.send_contact(
        "main",
        ContactMessage::new(Target::phone("123"), "Eve\nTEL;waid=666:+666", "123"),
    )
    .await
    .unwrap();

    let (_, content, _) = only_send(&session);
    let MessageContent::Contact { vcard, .. } = content else {
        panic!("expected a contact card, got {content:?}");
    };
    let phones: Vec<&str> = vcard.lines().filter(|l| l.starts_with("TEL")).collect();
    assert_eq!(phones, vec!["TEL;type=CELL;type=VOICE;waid=123:+123"]);
}

#[tokio::test]
async fn country_code_rewrites_local_numbers() {
    let (m, session) = setup().await;
    let m = m.with_config(MessagingConfig::default().with_country_code("44"));

    m.send_contact("main", ContactMessage::new(Target::phone("07700 900123"), "Bob", "07700900123"))
        .await
        .unwrap();

    let (jid, content, _) = only_send(&session);
    assert_eq!(jid.as_str(), "447700900123@s.whatsapp.net");
    assert!(matches!(content, MessageContent::Contact { ref display_name, .. } if display_name == "Bob"));
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Logs(Arc<Mutex<Vec<u8>>>);

impl Write for Logs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Logs {
    type Writer = Logs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Logs {
    fn lines_with(&self, needle: &str) -> Vec<String> {
        let text = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
        text.lines()
            .filter(|l| l.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

#[tokio::test(start_paused = true)]
async fn typing_and_read_logs_carry_kind() {
    let logs = Logs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (m, _session) = setup().await;
    m.send_typing("main", &Target::phone("123"), Some(Duration::from_millis(5)))
        .await
        .unwrap();
    m.read_message("main", ReadReceipt::new(Target::phone("123"), "ID1"))
        .await
        .unwrap();

    let typing = logs.lines_with("sending presence");
    assert_eq!(typing.len(), 1);
    assert!(typing[0].contains("kind=\"typing\""), "{typing:?}");

    let read = logs.lines_with("marking read");
    assert_eq!(read.len(), 1);
    assert!(read[0].contains("kind=\"read\""), "{read:?}");
}
