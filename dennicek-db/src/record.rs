use dennicek_common::model::{
    ModelValidationError,
    post::{Comment, Post},
    recording::Recording,
    text::NonEmptyText,
};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub post_snowflake: i64,
    pub name: String,
    pub subject: String,
    pub image: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct CommentRecord {
    pub post_snowflake: i64,
    pub author: String,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct RecordingRecord {
    pub recording_snowflake: i64,
    pub author: String,
    pub subject: String,
    pub audio: Vec<u8>,
    pub created_at: OffsetDateTime,
}

impl PostRecord {
    pub fn into_post(self, comments: Vec<Comment>) -> Result<Post, ModelValidationError> {
        Ok(Post {
            id: self.post_snowflake.cast_unsigned().into(),
            name: NonEmptyText::new(self.name)?,
            subject: NonEmptyText::new(self.subject)?,
            image: NonEmptyText::new(self.image)?,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<CommentRecord> for Comment {
    type Error = ModelValidationError;

    fn try_from(value: CommentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            author: NonEmptyText::new(value.author)?,
            comment: NonEmptyText::new(value.comment)?,
            created_at: value.created_at,
        })
    }
}

impl TryFrom<RecordingRecord> for Recording {
    type Error = ModelValidationError;

    fn try_from(value: RecordingRecord) -> Result<Self, Self::Error> {
        if value.audio.is_empty() {
            return Err(ModelValidationError::EmptyAudio);
        }

        Ok(Self {
            id: value.recording_snowflake.cast_unsigned().into(),
            author: NonEmptyText::new(value.author)?,
            subject: NonEmptyText::new(value.subject)?,
            audio: value.audio,
            created_at: value.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{CommentRecord, PostRecord, RecordingRecord};
    use dennicek_common::model::{
        ModelValidationError, post::Comment, recording::Recording, text::EmptyTextError,
    };
    use time::macros::datetime;

    #[test]
    fn post_record_keeps_snowflake_bits() {
        let record = PostRecord {
            post_snowflake: -1,
            name: "Ana".into(),
            subject: "Prvy zapis".into(),
            image: "<img-data>".into(),
            created_at: datetime!(2026-03-14 15:08 UTC),
            updated_at: datetime!(2026-03-14 15:08 UTC),
        };

        let post = record.into_post(Vec::new()).unwrap();
        assert_eq!(u64::from(post.id), u64::MAX);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn invalid_records_are_rejected() {
        let comment = CommentRecord {
            post_snowflake: 1,
            author: String::new(),
            comment: "Super!".into(),
            created_at: datetime!(2026-03-14 15:09 UTC),
        };
        assert_eq!(
            Comment::try_from(comment),
            Err(ModelValidationError::EmptyText(EmptyTextError))
        );

        let recording = RecordingRecord {
            recording_snowflake: 2,
            author: "Eva".into(),
            subject: "Melodia".into(),
            audio: Vec::new(),
            created_at: datetime!(2026-03-14 15:09 UTC),
        };
        assert_eq!(
            Recording::try_from(recording),
            Err(ModelValidationError::EmptyAudio)
        );
    }
}
