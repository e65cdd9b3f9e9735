//! Media attachments for questions (images, videos, audio)
//!
//! This module defines the media types that can be attached to board
//! questions. The payload is an opaque data URL (or plain URL) produced
//! by an external encoding collaborator; the core never interprets the
//! bytes, it only classifies the kind from a MIME-type-like string.

use garde::Validate;
use serde::{Deserialize, Serialize};

/// The kind of an attached media payload
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image content
    Image,
    /// Video content
    Video,
    /// Audio-only content
    Audio,
}

impl MediaKind {
    /// Classifies a MIME-type-like string into a media kind
    ///
    /// Anything that is not recognizably video or audio is treated as an
    /// image, matching the forgiving classification of the board UI.
    ///
    /// # Arguments
    ///
    /// * `mime` - A MIME type string such as `"video/mp4"` or `"image/png"`
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video") {
            Self::Video
        } else if mime.starts_with("audio") {
            Self::Audio
        } else {
            Self::Image
        }
    }
}

/// A media attachment on a question
///
/// Attachments are immutable once created; replacing one is a
/// delete-then-attach operation in the editor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub struct Media {
    /// The classified kind of the payload
    #[garde(skip)]
    pub kind: MediaKind,
    /// Opaque data URL or URL string supplied by the encoding collaborator
    #[garde(length(min = 1))]
    pub payload: String,
}

impl Media {
    /// Creates a media attachment, classifying its kind from a MIME string
    ///
    /// # Arguments
    ///
    /// * `mime` - A MIME-type-like string used only for classification
    /// * `payload` - The opaque encoded payload
    pub fn from_mime(mime: &str, payload: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::from_mime(mime),
            payload: payload.into(),
        }
    }
}

/// One of the two independent media attachment slots on a question
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    /// The first attachment slot
    First,
    /// The second attachment slot
    Second,
}
