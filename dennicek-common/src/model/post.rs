use crate::model::{Id, ValidationError, required, text::NonEmptyText};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A journal entry together with its comments, oldest comment first.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id<PostMarker>,
    pub name: NonEmptyText,
    pub subject: NonEmptyText,
    /// Drawing as a data URL. Never inspected.
    pub image: NonEmptyText,
    pub comments: Vec<Comment>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: NonEmptyText,
    pub comment: NonEmptyText,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewPost {
    pub name: NonEmptyText,
    pub subject: NonEmptyText,
    pub image: NonEmptyText,
}

impl NewPost {
    pub fn new(name: String, subject: String, image: String) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", name)?,
            subject: required("subject", subject)?,
            image: required("image", image)?,
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct NewComment {
    pub author: NonEmptyText,
    pub comment: NonEmptyText,
}

impl NewComment {
    pub fn new(author: String, comment: String) -> Result<Self, ValidationError> {
        Ok(Self {
            author: required("author", author)?,
            comment: required("comment", comment)?,
        })
    }
}
