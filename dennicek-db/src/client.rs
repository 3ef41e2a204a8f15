use crate::{
    Result,
    id::IdGenerator,
    record::{CommentRecord, PostRecord, RecordingRecord},
    store::Store,
};
use async_trait::async_trait;
use dennicek_common::{
    model::{
        Id,
        post::{Comment, NewComment, NewPost, Post, PostMarker},
        recording::{NewRecording, Recording, RecordingMarker},
    },
    snowflake::{ProcessId, WorkerId},
};
use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions, query, query_as, query_scalar};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!();

/// [`Store`] backed by PostgreSQL.
#[derive(Debug)]
pub struct DbClient {
    pool: PgPool,
    ids: IdGenerator,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool, worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            pool,
            ids: IdGenerator::new(worker_id, process_id),
        }
    }

    /// Connects to `database_url` and brings the schema up to date.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        worker_id: WorkerId,
        process_id: ProcessId,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let client = Self::new(pool, worker_id, process_id);
        client.migrate().await?;

        Ok(client)
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");

        Ok(())
    }

    async fn fetch_comments(&self, post_snowflake: i64) -> Result<Vec<Comment>> {
        let records = query_as::<_, CommentRecord>(
            "
            SELECT
                comments.post_snowflake,
                comments.author,
                comments.comment,
                comments.created_at
            FROM
                posts.comments
            WHERE
                comments.post_snowflake = $1
            ORDER BY
                comments.comment_sequence
            ",
        )
        .bind(post_snowflake)
        .fetch_all(&self.pool)
        .await?;

        let comments = records
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<_, _>>()?;
        Ok(comments)
    }
}

#[async_trait]
impl Store for DbClient {
    async fn create_post(&self, post: &NewPost) -> Result<Id<PostMarker>> {
        let post_id: Id<PostMarker> = self.ids.next()?;
        let now = OffsetDateTime::now_utc();

        let returned_snowflake = query_scalar::<_, i64>(
            "
            INSERT INTO posts.posts (post_snowflake, name, subject, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING posts.post_snowflake
            ",
        )
        .bind(u64::from(post_id).cast_signed())
        .bind(post.name.get())
        .bind(post.subject.get())
        .bind(post.image.get())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(%post_id, "Created post");
        Ok(returned_snowflake.cast_unsigned().into())
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let post_records = query_as::<_, PostRecord>(
            "
            SELECT
                posts.post_snowflake,
                posts.name,
                posts.subject,
                posts.image,
                posts.created_at,
                posts.updated_at
            FROM
                posts.posts
            ORDER BY
                posts.post_snowflake
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let comment_records = query_as::<_, CommentRecord>(
            "
            SELECT
                comments.post_snowflake,
                comments.author,
                comments.comment,
                comments.created_at
            FROM
                posts.comments
            ORDER BY
                comments.comment_sequence
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut comments_by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
        for record in comment_records {
            comments_by_post
                .entry(record.post_snowflake)
                .or_default()
                .push(record.try_into()?);
        }

        let posts = post_records
            .into_iter()
            .map(|record| {
                let comments = comments_by_post
                    .remove(&record.post_snowflake)
                    .unwrap_or_default();
                record.into_post(comments)
            })
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let post_snowflake = u64::from(post_id).cast_signed();

        let record = query_as::<_, PostRecord>(
            "
            SELECT
                posts.post_snowflake,
                posts.name,
                posts.subject,
                posts.image,
                posts.created_at,
                posts.updated_at
            FROM
                posts.posts
            WHERE
                posts.post_snowflake = $1
            ",
        )
        .bind(post_snowflake)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            return Ok(None);
        };

        let comments = self.fetch_comments(post_snowflake).await?;
        Ok(Some(record.into_post(comments)?))
    }

    async fn add_comment(
        &self,
        post_id: Id<PostMarker>,
        comment: &NewComment,
    ) -> Result<Option<Post>> {
        let now = OffsetDateTime::now_utc();

        // One statement, so the comment and the post's timestamp land together.
        let inserted = query(
            "
            WITH post AS (
                UPDATE posts.posts
                SET updated_at = $4
                WHERE posts.post_snowflake = $1
                RETURNING posts.post_snowflake
            )
            INSERT INTO posts.comments (post_snowflake, author, comment, created_at)
            SELECT post.post_snowflake, $2, $3, $4 FROM post
            ",
        )
        .bind(u64::from(post_id).cast_signed())
        .bind(comment.author.get())
        .bind(comment.comment.get())
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(None);
        }

        debug!(%post_id, "Added comment");
        self.fetch_post(post_id).await
    }

    async fn create_recording(&self, recording: &NewRecording) -> Result<Id<RecordingMarker>> {
        let recording_id: Id<RecordingMarker> = self.ids.next()?;

        let returned_snowflake = query_scalar::<_, i64>(
            "
            INSERT INTO recordings.recordings (recording_snowflake, author, subject, audio, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING recordings.recording_snowflake
            ",
        )
        .bind(u64::from(recording_id).cast_signed())
        .bind(recording.author.get())
        .bind(recording.subject.get())
        .bind(recording.audio.as_slice())
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.pool)
        .await?;

        debug!(%recording_id, bytes = recording.audio.len(), "Created recording");
        Ok(returned_snowflake.cast_unsigned().into())
    }

    async fn fetch_recordings(&self) -> Result<Vec<Recording>> {
        let records = query_as::<_, RecordingRecord>(
            "
            SELECT
                recordings.recording_snowflake,
                recordings.author,
                recordings.subject,
                recordings.audio,
                recordings.created_at
            FROM
                recordings.recordings
            ORDER BY
                recordings.recording_snowflake
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let recordings = records
            .into_iter()
            .map(Recording::try_from)
            .collect::<Result<_, _>>()?;
        Ok(recordings)
    }

    async fn clear_posts(&self) -> Result<u64> {
        let deleted = query("DELETE FROM posts.posts")
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!(deleted, "Cleared posts");
        Ok(deleted)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
