//! Authentication gate for the watch routes.
//!
//! A [`Verifier`] looks at request headers and either lets the request through
//! or rejects it. The operations themselves never see credentials.

use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

pub trait Verifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Verdict;
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Verifier for AllowAll {
    fn verify(&self, _headers: &HeaderMap) -> Verdict {
        Verdict::Allow
    }
}

/// Requires `Authorization: Bearer <token>` with one fixed token.
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Verifier for BearerToken {
    fn verify(&self, headers: &HeaderMap) -> Verdict {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Verdict::Deny("missing authorization header".into());
        };
        let Ok(value) = value.to_str() else {
            return Verdict::Deny("malformed authorization header".into());
        };

        let mut parts = value.split(' ');
        let scheme = parts.next().unwrap_or_default();
        let token = parts.next();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_none() || parts.next().is_some() {
            return Verdict::Deny("expected a bearer token".into());
        }
        if token != Some(self.token.as_str()) {
            return Verdict::Deny("invalid token".into());
        }
        Verdict::Allow
    }
}
