use crate::server::{Result, ServerError, ServerRouter, json::Json, routes::Created};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use dennicek_common::model::{
    Id,
    post::{NewComment, NewPost, Post, PostMarker},
};
use dennicek_db::store::Store;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_post(add_comment)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

// Missing fields deserialize as empty, so both report as validation errors.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(default)]
struct CreatePostBody {
    name: String,
    subject: String,
    image: String,
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(store): State<Arc<dyn Store>>,
) -> Result<Json<Vec<Post>>> {
    let posts = store.fetch_posts().await?;

    Ok(Json(posts))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(store): State<Arc<dyn Store>>,
    Json(body): Json<CreatePostBody>,
) -> Result<Json<Created<PostMarker>>> {
    let post = NewPost::new(body.name, body.subject, body.image)?;
    let id = store.create_post(&post).await?;

    Ok(Json(Created {
        message: "Post saved successfully!",
        id,
    }))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<dyn Store>>,
) -> Result<Json<Post>> {
    let post = store
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/comments", rejection(ServerError))]
struct PostCommentsPath {
    id: Id<PostMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(default)]
struct AddCommentBody {
    author: String,
    comment: String,
}

async fn add_comment(
    PostCommentsPath { id }: PostCommentsPath,
    State(store): State<Arc<dyn Store>>,
    Json(body): Json<AddCommentBody>,
) -> Result<Json<Post>> {
    let comment = NewComment::new(body.author, body.comment)?;
    let post = store
        .add_comment(id, &comment)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use crate::server::testing::{get, post_json, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn create_then_list_and_get() {
        let app = test_app();

        let (status, created) = post_json(
            &app,
            "/api/posts",
            &json!({"name": "Ana", "subject": "Prvy zapis", "image": "<img-data>"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["message"], "Post saved successfully!");
        let id = created["id"].as_str().unwrap().to_owned();

        let (status, posts) = get(&app, "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        let posts = posts.as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["id"], id.as_str());
        assert_eq!(posts[0]["name"], "Ana");
        assert_eq!(posts[0]["subject"], "Prvy zapis");
        assert_eq!(posts[0]["image"], "<img-data>");
        assert_eq!(posts[0]["comments"], json!([]));
        assert!(posts[0]["createdAt"].is_string());

        let (status, post) = get(&app, &format!("/api/posts/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post, posts[0]);
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let app = test_app();

        let (status, body) = post_json(
            &app,
            "/api/posts",
            &json!({"name": "", "subject": "Prvy zapis", "image": "<img-data>"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["message"].as_str().unwrap().contains("name"));

        let (status, _) =
            post_json(&app, "/api/posts", &json!({"name": "Ana", "image": "x"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, posts) = get(&app, "/api/posts").await;
        assert_eq!(posts, json!([]));
    }

    #[tokio::test]
    async fn lists_every_post() {
        let app = test_app();

        for i in 0..3 {
            let (status, _) = post_json(
                &app,
                "/api/posts",
                &json!({"name": format!("Autor {i}"), "subject": "zapis", "image": "<img-data>"}),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, posts) = get(&app, "/api/posts").await;
        assert_eq!(posts.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn comment_is_appended() {
        let app = test_app();
        let (_, created) = post_json(
            &app,
            "/api/posts",
            &json!({"name": "Ana", "subject": "Prvy zapis", "image": "<img-data>"}),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_owned();
        let comments_uri = format!("/api/posts/{id}/comments");

        let (status, post) = post_json(
            &app,
            &comments_uri,
            &json!({"author": "Jan", "comment": "Super!"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post["comments"].as_array().unwrap().len(), 1);

        let (_, post) = post_json(
            &app,
            &comments_uri,
            &json!({"author": "Eva", "comment": "Pekne"}),
        )
        .await;
        let comments = post["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["author"], "Jan");
        assert_eq!(comments[0]["comment"], "Super!");
        assert_eq!(comments[1]["author"], "Eva");

        let (_, fetched) = get(&app, &format!("/api/posts/{id}")).await;
        assert_eq!(fetched, post);
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let app = test_app();

        let (status, body) = get(&app, "/api/posts/12345").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);

        let (status, _) = post_json(
            &app,
            "/api/posts/12345/comments",
            &json!({"author": "Jan", "comment": "Super!"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&app, "/api/posts/not-an-id").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let app = test_app();
        let (_, created) = post_json(
            &app,
            "/api/posts",
            &json!({"name": "Ana", "subject": "Prvy zapis", "image": "<img-data>"}),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_owned();

        let (status, _) = post_json(
            &app,
            &format!("/api/posts/{id}/comments"),
            &json!({"author": "Jan", "comment": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, post) = get(&app, &format!("/api/posts/{id}")).await;
        assert_eq!(post["comments"], json!([]));
    }
}
