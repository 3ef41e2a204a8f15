use clap::Parser;
use dennicek_api::config::{self, InitError, StoreEnv};
use dennicek_common::model::{
    ValidationError,
    post::{NewComment, NewPost},
};
use dennicek_db::{DbError, store::Store};
use thiserror::Error;
use tracing::info;

/// A single pixel PNG.
const BLANK_DRAWING: &str = "data:image/png;base64,\
    iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Replaces all posts with a small set of sample posts.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Only delete the existing posts.
    #[arg(short, long)]
    destroy: bool,
}

#[derive(Debug, Error)]
enum SeedError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Invalid sample data: {0}")]
    Sample(#[from] ValidationError),
}

fn sample_posts() -> Result<Vec<(NewPost, Vec<NewComment>)>, ValidationError> {
    let post = |name: &str, subject: &str| {
        NewPost::new(name.to_owned(), subject.to_owned(), BLANK_DRAWING.to_owned())
    };
    let comment =
        |author: &str, comment: &str| NewComment::new(author.to_owned(), comment.to_owned());

    Ok(vec![
        (
            post("Ana", "Prvy zapis")?,
            vec![comment("Jan", "Super!")?, comment("Eva", "Pekne kreslene")?],
        ),
        (post("Jan", "Dnes prsalo cely den")?, Vec::new()),
        (
            post("Eva", "Skusam novy stetec")?,
            vec![comment("Ana", "Aky stetec?")?],
        ),
    ])
}

async fn seed(store: &dyn Store, destroy: bool) -> Result<(), SeedError> {
    let deleted = store.clear_posts().await?;
    info!(deleted, "Posts deleted");

    if destroy {
        return Ok(());
    }

    let samples = sample_posts()?;
    let created = samples.len();
    for (post, comments) in samples {
        let post_id = store.create_post(&post).await?;
        for comment in &comments {
            store.add_comment(post_id, comment).await?;
        }
    }
    info!(created, "Sample posts imported");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SeedError> {
    let args = Args::parse();

    config::install_tracing();
    config::load_dotenv()?;
    let store_env: StoreEnv = config::get_env()?;

    let store = config::open_store(&store_env).await?;
    let result = seed(store.as_ref(), args.destroy).await;
    store.close().await;

    result
}
