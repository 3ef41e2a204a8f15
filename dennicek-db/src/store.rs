use crate::Result;
use async_trait::async_trait;
use dennicek_common::model::{
    Id,
    post::{NewComment, NewPost, Post, PostMarker},
    recording::{NewRecording, Recording, RecordingMarker},
};
use std::fmt::Debug;

/// Persistence for posts and recordings.
///
/// Posts and recordings are write-once. The only mutation is appending a comment,
/// which implementations perform as a single atomic write.
#[async_trait]
pub trait Store: Debug + Send + Sync {
    async fn create_post(&self, post: &NewPost) -> Result<Id<PostMarker>>;

    /// All posts, each with its comments in insertion order.
    async fn fetch_posts(&self) -> Result<Vec<Post>>;

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>>;

    /// Returns the updated post, or `None` if no post has the given id.
    async fn add_comment(
        &self,
        post_id: Id<PostMarker>,
        comment: &NewComment,
    ) -> Result<Option<Post>>;

    async fn create_recording(&self, recording: &NewRecording) -> Result<Id<RecordingMarker>>;

    async fn fetch_recordings(&self) -> Result<Vec<Recording>>;

    /// Deletes every post along with its comments. Returns the number of deleted posts.
    async fn clear_posts(&self) -> Result<u64>;

    async fn close(&self);
}
