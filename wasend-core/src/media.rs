//! Media references and MIME type mapping.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// MIME type used for voice notes.
pub const VOICE_NOTE_MIMETYPE: &str = "audio/ogg; codecs=opus";

/// MIME type used for stickers.
pub const STICKER_MIMETYPE: &str = "image/webp";

/// Document extensions and their MIME types.
const DOCUMENT_MIMETYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("rtf", "application/rtf"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("zip", "application/zip"),
    ("rar", "application/vnd.rar"),
    ("7z", "application/x-7z-compressed"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("apk", "application/vnd.android.package-archive"),
];

/// Where the session should load media from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    /// Remote URL fetched by the session.
    Url(String),
    /// Local file path.
    Path(PathBuf),
    /// Raw bytes already in memory.
    Bytes(Vec<u8>),
}

impl MediaSource {
    /// Build a source from a CLI-style string: URLs for `http(s)://`, paths otherwise.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Whether the reference points at nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Url(url) => url.trim().is_empty(),
            Self::Path(path) => path.as_os_str().is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

/// Return the media if present and non-empty, otherwise a `MissingMedia` error.
pub(crate) fn require(media: Option<MediaSource>, kind: &'static str) -> Result<MediaSource> {
    media
        .filter(|m| !m.is_empty())
        .ok_or(Error::MissingMedia(kind))
}

/// Look up the MIME type for a document by its file extension.
///
/// ```
/// use wasend_core::media::mime_for_document;
///
/// assert_eq!(mime_for_document("report.PDF").unwrap(), "application/pdf");
/// assert!(mime_for_document("archive").is_err());
/// ```
pub fn mime_for_document(file_name: &str) -> Result<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::UnsupportedExtension(file_name.to_string()))?;

    DOCUMENT_MIMETYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .ok_or(Error::UnsupportedExtension(ext))
}
