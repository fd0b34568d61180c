//! Content-type classification for media downloads.
//!
//! Only `image/*`, `audio/*` and `video/*` types are accepted, and only when a
//! filename extension can be resolved for them. Resolution goes through a small
//! table of preferred extensions first, then the `mime_guess` table. An
//! extension is never invented for a subtype neither table knows.

use tracing::trace;

/// Top-level types accepted as media.
const MEDIA_PREFIXES: &[&str] = &["image/", "audio/", "video/"];

/// Canonical extensions pinned ahead of the `mime_guess` lookup.
///
/// `mime_guess` returns every extension registered for a type with no
/// canonical default among them (`image/jpeg` lists `jfif`, `jpe`, `jpeg` and
/// `jpg`), so the conventional extension for common media types is fixed
/// here. Types not listed fall back to the table: the extension equal to the
/// subtype if the table has one, otherwise its first entry.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
    ("image/tiff", "tif"),
    ("image/bmp", "bmp"),
    ("image/x-icon", "ico"),
    ("audio/mpeg", "mp3"),
    ("audio/mp4", "m4a"),
    ("audio/ogg", "ogg"),
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/flac", "flac"),
    ("audio/webm", "weba"),
    ("video/mp4", "mp4"),
    ("video/mpeg", "mpeg"),
    ("video/webm", "webm"),
    ("video/ogg", "ogv"),
    ("video/quicktime", "mov"),
    ("video/x-msvideo", "avi"),
    ("video/x-matroska", "mkv"),
];

/// Result of classifying a content-type header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaClassification {
    /// Acceptable media; `extension` is lowercase and has no leading dot.
    Accepted {
        /// Canonical filename extension.
        extension: String,
    },
    /// Not media, or no extension is known for the type.
    Rejected,
}

impl MediaClassification {
    /// Returns the extension when accepted.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Accepted { extension } => Some(extension),
            Self::Rejected => None,
        }
    }

    /// Returns true when the content-type was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Classifies an optional content-type header value.
///
/// An absent header is rejected.
#[must_use]
pub fn classify(content_type: Option<&str>) -> MediaClassification {
    content_type.map_or(MediaClassification::Rejected, classify_str)
}

/// Classifies a raw content-type header value.
///
/// Parameters (`; charset=...`) are ignored; the type is trimmed and
/// lowercased before matching.
#[must_use]
pub fn classify_str(content_type: &str) -> MediaClassification {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if essence.is_empty() || !MEDIA_PREFIXES.iter().any(|p| essence.starts_with(p)) {
        return MediaClassification::Rejected;
    }

    match media_extension(&essence) {
        Some(extension) => {
            trace!(content_type = %essence, extension, "classified media type");
            MediaClassification::Accepted {
                extension: extension.to_string(),
            }
        }
        None => MediaClassification::Rejected,
    }
}

/// Resolves the canonical extension for a lowercase MIME essence.
fn media_extension(essence: &str) -> Option<&'static str> {
    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(mime, _)| *mime == essence) {
        return Some(*ext);
    }

    let candidates = mime_guess::get_mime_extensions_str(essence)?;
    let subtype = essence.split_once('/').map_or("", |(_, sub)| sub);
    candidates
        .iter()
        .find(|ext| ext.eq_ignore_ascii_case(subtype))
        .or_else(|| candidates.first())
        .copied()
}
