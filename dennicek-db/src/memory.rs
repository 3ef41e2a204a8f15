use crate::{Result, id::IdGenerator, store::Store};
use async_trait::async_trait;
use dennicek_common::{
    model::{
        Id,
        post::{Comment, NewComment, NewPost, Post, PostMarker},
        recording::{NewRecording, Recording, RecordingMarker},
    },
    snowflake::{ProcessId, WorkerId},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use tracing::debug;

/// [`Store`] that keeps everything in process memory. Contents are lost on shutdown.
#[derive(Debug)]
pub struct MemoryStore {
    ids: IdGenerator,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    posts: Vec<Post>,
    recordings: Vec<Recording>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            ids: IdGenerator::new(worker_id, process_id),
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(WorkerId::default(), ProcessId::default())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_post(&self, post: &NewPost) -> Result<Id<PostMarker>> {
        let post_id = self.ids.next()?;
        let now = OffsetDateTime::now_utc();

        self.state().posts.push(Post {
            id: post_id,
            name: post.name.clone(),
            subject: post.subject.clone(),
            image: post.image.clone(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        });

        debug!(%post_id, "Created post");
        Ok(post_id)
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        Ok(self.state().posts.clone())
    }

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let state = self.state();
        let post = state.posts.iter().find(|post| post.id == post_id).cloned();

        Ok(post)
    }

    async fn add_comment(
        &self,
        post_id: Id<PostMarker>,
        comment: &NewComment,
    ) -> Result<Option<Post>> {
        let mut state = self.state();
        let Some(post) = state.posts.iter_mut().find(|post| post.id == post_id) else {
            return Ok(None);
        };

        let now = OffsetDateTime::now_utc();
        post.comments.push(Comment {
            author: comment.author.clone(),
            comment: comment.comment.clone(),
            created_at: now,
        });
        post.updated_at = now;

        debug!(%post_id, "Added comment");
        Ok(Some(post.clone()))
    }

    async fn create_recording(&self, recording: &NewRecording) -> Result<Id<RecordingMarker>> {
        let recording_id = self.ids.next()?;

        self.state().recordings.push(Recording {
            id: recording_id,
            author: recording.author.clone(),
            subject: recording.subject.clone(),
            audio: recording.audio.clone(),
            created_at: OffsetDateTime::now_utc(),
        });

        debug!(%recording_id, bytes = recording.audio.len(), "Created recording");
        Ok(recording_id)
    }

    async fn fetch_recordings(&self) -> Result<Vec<Recording>> {
        Ok(self.state().recordings.clone())
    }

    async fn clear_posts(&self) -> Result<u64> {
        let mut state = self.state();
        let deleted = state.posts.len() as u64;
        state.posts.clear();

        Ok(deleted)
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use crate::{memory::MemoryStore, store::Store};
    use dennicek_common::model::{
        post::{NewComment, NewPost},
        recording::NewRecording,
    };

    fn new_post(name: &str, subject: &str) -> NewPost {
        NewPost::new(name.into(), subject.into(), "<img-data>".into()).unwrap()
    }

    #[tokio::test]
    async fn created_post_is_listed_and_fetchable() {
        let store = MemoryStore::default();

        let post_id = store
            .create_post(&new_post("Ana", "Prvy zapis"))
            .await
            .unwrap();

        let posts = store.fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, post_id);
        assert_eq!(posts[0].name.get(), "Ana");
        assert_eq!(posts[0].subject.get(), "Prvy zapis");
        assert!(posts[0].comments.is_empty());
        assert_eq!(posts[0].created_at, posts[0].updated_at);

        let post = store.fetch_post(post_id).await.unwrap().unwrap();
        assert_eq!(post, posts[0]);
    }

    #[tokio::test]
    async fn lists_every_created_post() {
        let store = MemoryStore::default();

        let mut ids = Vec::new();
        for i in 0..5 {
            let post = new_post(&format!("Autor {i}"), "zapis");
            ids.push(store.create_post(&post).await.unwrap());
        }

        let posts = store.fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 5);
        assert_eq!(posts.iter().map(|post| post.id).collect::<Vec<_>>(), ids);
    }

    #[tokio::test]
    async fn comments_append_in_order() {
        let store = MemoryStore::default();
        let post_id = store
            .create_post(&new_post("Ana", "Prvy zapis"))
            .await
            .unwrap();

        let first = NewComment::new("Jan".into(), "Super!".into()).unwrap();
        let second = NewComment::new("Eva".into(), "Pekne".into()).unwrap();

        let after_first = store.add_comment(post_id, &first).await.unwrap().unwrap();
        assert_eq!(after_first.comments.len(), 1);
        assert_eq!(after_first.comments[0].author.get(), "Jan");

        let after_second = store.add_comment(post_id, &second).await.unwrap().unwrap();
        assert_eq!(after_second.comments.len(), 2);
        assert_eq!(after_second.comments[0], after_first.comments[0]);
        assert_eq!(after_second.comments[1].author.get(), "Eva");
        assert_eq!(after_second.updated_at, after_second.comments[1].created_at);

        let fetched = store.fetch_post(post_id).await.unwrap().unwrap();
        assert_eq!(fetched, after_second);
    }

    #[tokio::test]
    async fn comment_on_unknown_post() {
        let store = MemoryStore::default();
        let comment = NewComment::new("Jan".into(), "Super!".into()).unwrap();

        assert_eq!(store.add_comment(12_u64.into(), &comment).await.unwrap(), None);
        assert_eq!(store.fetch_post(12_u64.into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn recordings_keep_audio() {
        let store = MemoryStore::default();
        let audio = vec![0x1A, 0x45, 0xDF, 0xA3];

        let recording_id = store
            .create_recording(
                &NewRecording::new("Eva".into(), "Melodia".into(), audio.clone()).unwrap(),
            )
            .await
            .unwrap();

        let recordings = store.fetch_recordings().await.unwrap();
        assert_eq!(recordings.len(), 1);
        assert_eq!(recordings[0].id, recording_id);
        assert_eq!(recordings[0].audio, audio);
    }

    #[tokio::test]
    async fn clear_posts_leaves_recordings() {
        let store = MemoryStore::default();
        store.create_post(&new_post("Ana", "a")).await.unwrap();
        store.create_post(&new_post("Jan", "b")).await.unwrap();
        store
            .create_recording(&NewRecording::new("Eva".into(), "c".into(), vec![1]).unwrap())
            .await
            .unwrap();

        assert_eq!(store.clear_posts().await.unwrap(), 2);
        assert!(store.fetch_posts().await.unwrap().is_empty());
        assert_eq!(store.fetch_recordings().await.unwrap().len(), 1);
    }
}
