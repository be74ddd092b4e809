//! Comment operations against a [`Store`].
//!
//! These are plain synchronous functions; callers decide how the store is
//! locked. A failed operation leaves the store untouched.

use serde_json::Value;

use crate::{
    error::WatchError,
    model::{Comment, CommentPayload, VideoDetails},
    store::Store,
};

/// Returns the video with its comment count. Read-only.
pub fn video_details(store: &Store, video_id: Option<&str>) -> Result<VideoDetails, WatchError> {
    video_id
        .and_then(|id| store.video(id))
        .map(VideoDetails::from)
        .ok_or(WatchError::VideoUnavailable)
}

/// Appends a comment to the end of the video's list.
pub fn post_comment(
    store: &mut Store,
    video_id: Option<&str>,
    payload: CommentPayload,
) -> Result<(), WatchError> {
    let video = video_id
        .and_then(|id| store.video_mut(id))
        .ok_or(WatchError::PostFailed)?;
    video.comments.push(Comment::from(payload));
    Ok(())
}

/// Rewrites every comment by `payload.user` on the video and marks it edited.
/// Returns how many comments changed.
pub fn edit_comment(
    store: &mut Store,
    video_id: Option<&str>,
    payload: CommentPayload,
) -> Result<usize, WatchError> {
    let video = video_id
        .and_then(|id| store.video_mut(id))
        .ok_or(WatchError::EditFailed)?;

    let mut edited = 0;
    for comment in video
        .comments
        .iter_mut()
        .filter(|comment| comment.is_by(payload.user.as_ref()))
    {
        comment.commented_on = payload.commented_on.clone();
        comment.data = payload.data.clone();
        comment.is_edited = Some(true);
        edited += 1;
    }

    if edited == 0 {
        return Err(WatchError::EditFailed);
    }
    Ok(edited)
}

/// Removes every comment by `user` on the video, adjacent ones included.
/// Returns how many comments were removed.
pub fn delete_comment(
    store: &mut Store,
    video_id: Option<&str>,
    user: Option<&Value>,
) -> Result<usize, WatchError> {
    let video = video_id
        .and_then(|id| store.video_mut(id))
        .ok_or(WatchError::DeleteFailed)?;

    let before = video.comments.len();
    video.comments.retain(|comment| !comment.is_by(user));
    let removed = before - video.comments.len();

    if removed == 0 {
        return Err(WatchError::DeleteFailed);
    }
    Ok(removed)
}
