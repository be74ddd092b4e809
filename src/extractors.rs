use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiError;

/// JSON body that never rejects a request for its shape.
///
/// A missing or blank body, a body without a JSON content type, and any JSON
/// value that is not an object all read as `{}`, so every field comes out
/// absent. Only bytes that are not JSON at all are refused, with a 400.
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::bad_request(err.body_text()))?;
        parse_lenient(&bytes).map(LenientJson)
    }
}

fn parse_lenient<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| ApiError::bad_request(format!("malformed JSON body: {err}")))?;
    if !value.is_object() {
        return Ok(T::default());
    }
    serde_json::from_value(value)
        .map_err(|err| ApiError::bad_request(format!("unreadable JSON body: {err}")))
}
