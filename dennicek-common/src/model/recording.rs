use crate::model::{Id, ValidationError, required, text::NonEmptyText};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct RecordingMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: Id<RecordingMarker>,
    pub author: NonEmptyText,
    pub subject: NonEmptyText,
    /// Raw audio as uploaded, base64 encoded on the wire.
    #[serde(with = "crate::util::base64_bytes")]
    pub audio: Vec<u8>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewRecording {
    pub author: NonEmptyText,
    pub subject: NonEmptyText,
    pub audio: Vec<u8>,
}

impl NewRecording {
    /// `audio` is reported as `recording`, the name of the upload field.
    pub fn new(author: String, subject: String, audio: Vec<u8>) -> Result<Self, ValidationError> {
        let author = required("author", author)?;
        let subject = required("subject", subject)?;
        if audio.is_empty() {
            return Err(ValidationError::MissingField("recording"));
        }

        Ok(Self {
            author,
            subject,
            audio,
        })
    }
}
