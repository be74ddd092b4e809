use axum::http::StatusCode;

/// Failures a watch operation reports back to the caller.
///
/// The `Display` text is the message sent to clients. Edit and delete do not
/// distinguish a missing video from a missing comment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error("This video isn't available anymore")]
    VideoUnavailable,

    #[error("Couldn't Post Comment")]
    PostFailed,

    #[error("Couldn't Edit Comment")]
    EditFailed,

    #[error("Couldn't Delete Comment")]
    DeleteFailed,

    #[error("{0}")]
    Unauthorized(String),
}

impl WatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WatchError::VideoUnavailable => StatusCode::NOT_FOUND,
            WatchError::PostFailed | WatchError::EditFailed | WatchError::DeleteFailed => {
                StatusCode::BAD_REQUEST
            }
            WatchError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}
