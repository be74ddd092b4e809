//! HTTP surface: the watch routes under the configured base path, plus the
//! profile at `/`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{
    auth::{Verdict, Verifier},
    comments,
    error::WatchError,
    extractors::LenientJson,
    model::{CommentPayload, DeletePayload, Message, UserProfile, VideoDetails},
    store::{SharedStore, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub verifier: Arc<dyn Verifier>,
}

impl AppState {
    pub fn new(store: Store, verifier: impl Verifier + 'static) -> Self {
        Self {
            store: store.into_shared(),
            verifier: Arc::new(verifier),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<WatchError> for ApiError {
    fn from(err: WatchError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Message::new(self.message))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct WatchQuery {
    v: Option<String>,
}

pub fn router(state: AppState, base_path: &str) -> Router {
    Router::new()
        .route(
            base_path,
            get(get_video_details)
                .post(post_comment)
                .put(edit_comment)
                .delete(delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/", get(profile))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn authenticate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    match state.verifier.verify(request.headers()) {
        Verdict::Allow => Ok(next.run(request).await),
        Verdict::Deny(reason) => {
            tracing::warn!(%reason, method = %request.method(), "rejecting unauthenticated request");
            Err(WatchError::Unauthorized(reason).into())
        }
    }
}

async fn profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.store.read().profile().clone())
}

async fn get_video_details(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
) -> ApiResult<Json<VideoDetails>> {
    let details = comments::video_details(&state.store.read(), query.v.as_deref())?;
    Ok(Json(details))
}

async fn post_comment(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
    LenientJson(payload): LenientJson<CommentPayload>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    comments::post_comment(&mut state.store.write(), query.v.as_deref(), payload)?;
    tracing::debug!(video_id = ?query.v, "comment posted");
    Ok((StatusCode::CREATED, Json(Message::new("Comment Posted!"))))
}

async fn edit_comment(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
    LenientJson(payload): LenientJson<CommentPayload>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let edited = comments::edit_comment(&mut state.store.write(), query.v.as_deref(), payload)?;
    tracing::debug!(video_id = ?query.v, edited, "comment edited");
    Ok((StatusCode::CREATED, Json(Message::new("Comment Edited!"))))
}

// 204 responses cannot carry a body, so the success message only goes to the log.
async fn delete_comment(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
    LenientJson(payload): LenientJson<DeletePayload>,
) -> ApiResult<StatusCode> {
    let removed = comments::delete_comment(
        &mut state.store.write(),
        query.v.as_deref(),
        payload.user.as_ref(),
    )?;
    tracing::debug!(video_id = ?query.v, removed, "Comment Deleted!");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{AllowAll, BearerToken},
        config::DEFAULT_BASE_PATH,
        model::{Comment, Video},
        seed::Seed,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const VID: &str = "vid1";

    fn test_store() -> Store {
        let mut seed = Seed::demo();
        seed.videos.push(Video {
            video_id: VID.into(),
            title: "Test video".into(),
            channel_id: None,
            description: None,
            views: None,
            likes: None,
            uploaded_on: None,
            comments: vec![Comment {
                user: Some(json!("alice")),
                commented_on: Some(json!("t0")),
                data: Some(json!("first!")),
                is_edited: None,
            }],
        });
        Store::from_seed(seed).unwrap()
    }

    fn app_with(verifier: impl Verifier + 'static) -> (Router, SharedStore) {
        let state = AppState::new(test_store(), verifier);
        let store = state.store.clone();
        (router(state, DEFAULT_BASE_PATH), store)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        auth: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn uri(video_id: &str) -> String {
        format!("{DEFAULT_BASE_PATH}?v={video_id}")
    }

    fn comment_count(store: &SharedStore, video_id: &str) -> usize {
        store.read().video(video_id).unwrap().comments.len()
    }

    #[tokio::test]
    async fn get_returns_every_video_with_count() {
        let (app, store) = app_with(AllowAll);
        let expected: Vec<(String, usize)> = store
            .read()
            .videos()
            .map(|video| (video.video_id.clone(), video.comments.len()))
            .collect();

        for (video_id, count) in expected {
            let (status, body) = send(&app, Method::GET, &uri(&video_id), None, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["videoId"], video_id.as_str());
            assert_eq!(body["commentCount"], count);
        }
    }

    #[tokio::test]
    async fn get_unknown_video_is_404() {
        let (app, _) = app_with(AllowAll);
        let (status, body) = send(&app, Method::GET, &uri("missing"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "This video isn't available anymore");

        let (status, _) = send(&app, Method::GET, DEFAULT_BASE_PATH, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_does_not_store_comment_count() {
        let (app, store) = app_with(AllowAll);
        let before = store.read().video(VID).unwrap().clone();
        send(&app, Method::GET, &uri(VID), None, None).await;
        assert_eq!(store.read().video(VID).unwrap(), &before);
    }

    #[tokio::test]
    async fn post_then_get_shows_new_comment() {
        let (app, store) = app_with(AllowAll);
        let body = json!({ "user": "u", "commentedOn": "t", "data": "hello" });
        let (status, reply) = send(&app, Method::POST, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["message"], "Comment Posted!");
        assert_eq!(comment_count(&store, VID), 2);

        let (status, video) = send(&app, Method::GET, &uri(VID), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(video["commentCount"], 2);
        assert_eq!(
            video["comments"][1],
            json!({ "user": "u", "commentedOn": "t", "data": "hello" })
        );
    }

    #[tokio::test]
    async fn post_to_unknown_video_is_400() {
        let (app, store) = app_with(AllowAll);
        let before: Vec<Video> = store.read().videos().cloned().collect();
        let body = json!({ "user": "u", "commentedOn": "t", "data": "hello" });
        let (status, reply) = send(&app, Method::POST, &uri("missing"), Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["message"], "Couldn't Post Comment");
        for video in before {
            assert_eq!(store.read().video(&video.video_id).unwrap(), &video);
        }
    }

    #[tokio::test]
    async fn put_edits_existing_comment() {
        let (app, store) = app_with(AllowAll);
        let body = json!({ "user": "alice", "commentedOn": "t1", "data": "edited" });
        let (status, reply) = send(&app, Method::PUT, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["message"], "Comment Edited!");

        let stored = store.read().video(VID).unwrap().comments[0].clone();
        assert_eq!(stored.data, Some(json!("edited")));
        assert_eq!(stored.commented_on, Some(json!("t1")));
        assert_eq!(stored.is_edited, Some(true));
    }

    #[tokio::test]
    async fn put_without_comment_is_400() {
        let (app, store) = app_with(AllowAll);
        let before = store.read().video(VID).unwrap().clone();
        let body = json!({ "user": "bob", "commentedOn": "t1", "data": "edited" });
        let (status, reply) = send(&app, Method::PUT, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["message"], "Couldn't Edit Comment");
        assert_eq!(store.read().video(VID).unwrap(), &before);
    }

    #[tokio::test]
    async fn delete_removes_comment_once() {
        let (app, store) = app_with(AllowAll);
        let body = json!({ "user": "alice" });
        let (status, reply) = send(&app, Method::DELETE, &uri(VID), Some(body.clone()), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(reply, Value::Null);
        assert_eq!(comment_count(&store, VID), 0);

        let (status, reply) = send(&app, Method::DELETE, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["message"], "Couldn't Delete Comment");
    }

    #[tokio::test]
    async fn delete_without_match_is_400() {
        let (app, store) = app_with(AllowAll);
        let body = json!({ "user": "bob" });
        let (status, _) = send(&app, Method::DELETE, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(comment_count(&store, VID), 1);
    }

    #[tokio::test]
    async fn root_returns_profile_without_auth() {
        let (app, store) = app_with(BearerToken::new("token"));
        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let profile = store.read().profile().clone();
        assert_eq!(body["username"], profile.username.as_str());
        assert_eq!(body["channelId"], profile.channel_id.as_str());
        assert_eq!(body["subscriptions"], json!(profile.subscriptions));
    }

    #[tokio::test]
    async fn bearer_gate_guards_watch_routes() {
        let (app, store) = app_with(BearerToken::new("token"));

        let (status, body) = send(&app, Method::GET, &uri(VID), None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "missing authorization header");

        let post = json!({ "user": "u", "commentedOn": "t", "data": "x" });
        let (status, _) = send(
            &app,
            Method::POST,
            &uri(VID),
            Some(post.clone()),
            Some("Bearer nope"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(comment_count(&store, VID), 1);

        let (status, _) = send(&app, Method::POST, &uri(VID), Some(post), Some("Bearer token")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(comment_count(&store, VID), 2);
    }

    #[tokio::test]
    async fn post_keeps_non_string_fields() {
        let (app, store) = app_with(AllowAll);
        let body = json!({ "user": 5, "commentedOn": 1_700_000_000, "data": "hello" });
        let (status, reply) = send(&app, Method::POST, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["message"], "Comment Posted!");

        let (_, video) = send(&app, Method::GET, &uri(VID), None, None).await;
        assert_eq!(
            video["comments"][1],
            json!({ "user": 5, "commentedOn": 1_700_000_000, "data": "hello" })
        );
        assert_eq!(comment_count(&store, VID), 2);
    }

    #[tokio::test]
    async fn bodiless_post_appends_empty_comment() {
        let (app, store) = app_with(AllowAll);
        let (status, reply) = send(&app, Method::POST, &uri(VID), None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["message"], "Comment Posted!");

        let stored = store.read().video(VID).unwrap().comments[1].clone();
        assert_eq!(stored, Comment::default());
    }

    #[tokio::test]
    async fn bodiless_delete() {
        let (app, store) = app_with(AllowAll);
        let (status, reply) = send(&app, Method::DELETE, &uri("missing"), None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["message"], "Couldn't Delete Comment");

        let (status, _) = send(&app, Method::DELETE, &uri(VID), None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(comment_count(&store, VID), 1);

        send(&app, Method::POST, &uri(VID), None, None).await;
        let (status, _) = send(&app, Method::DELETE, &uri(VID), None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(comment_count(&store, VID), 1);
    }

    #[tokio::test]
    async fn null_user_does_not_match_absent_user() {
        let (app, store) = app_with(AllowAll);
        send(&app, Method::POST, &uri(VID), Some(json!({ "data": "anon" })), None).await;

        let body = json!({ "user": null, "commentedOn": "t", "data": "x" });
        let (status, _) = send(&app, Method::PUT, &uri(VID), Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, &uri(VID), Some(json!({ "user": null })), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(comment_count(&store, VID), 2);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, store) = app_with(AllowAll);
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri(VID))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(comment_count(&store, VID), 1);
    }
}
