//! Records served by the watch API.
//!
//! Field names follow the JSON the frontend already speaks (camelCase), and the
//! same names are used by TOML seed files so a data set can be copied between
//! the two formats without renaming anything.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single comment attached to a video.
///
/// Comments carry no identifier of their own; they are addressed by the
/// author's `user` within the owning video. Whatever JSON a client sends for
/// a field is kept as-is. An omitted field stays absent, which is not the same
/// as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub commented_on: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Value>,
    /// Absent until the comment is edited for the first time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_edited: Option<bool>,
}

impl Comment {
    pub fn is_by(&self, user: Option<&Value>) -> bool {
        strictly_equal(self.user.as_ref(), user)
    }
}

/// Strict equality on JSON values as clients of this API have always seen it:
/// absent only equals absent, `null` only equals `null`, numbers compare by
/// value and objects or arrays never equal anything.
fn strictly_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Object(_) | Value::Array(_)), _)
        | (_, Some(Value::Object(_) | Value::Array(_))) => false,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a.as_f64() == b.as_f64(),
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key falls
/// back to `None` through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A video and its comments, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_on: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// The single channel profile exposed at the root path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub channel_id: String,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

/// Body accepted by the post and edit operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    #[serde(default, deserialize_with = "present")]
    pub user: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub commented_on: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub data: Option<Value>,
}

impl From<CommentPayload> for Comment {
    fn from(payload: CommentPayload) -> Self {
        Self {
            user: payload.user,
            commented_on: payload.commented_on,
            data: payload.data,
            is_edited: None,
        }
    }
}

/// Body accepted by the delete operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletePayload {
    #[serde(default, deserialize_with = "present")]
    pub user: Option<Value>,
}

/// Response for a video lookup: the stored record plus its derived comment
/// count. Built fresh for every read; never written back to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: Video,
    pub comment_count: usize,
}

impl From<&Video> for VideoDetails {
    fn from(video: &Video) -> Self {
        Self {
            video: video.clone(),
            comment_count: video.comments.len(),
        }
    }
}

/// `{"message": ...}` body used by every non-GET response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
