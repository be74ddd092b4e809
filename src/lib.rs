#![forbid(unsafe_code)]

//! Video comments API.
//!
//! The crate keeps a seeded, in-memory set of videos and exposes read, post,
//! edit and delete operations on their comments, both as plain functions
//! ([`comments`]) and as an axum router ([`api`]).

pub mod api;
pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod extractors;
pub mod model;
pub mod seed;
pub mod store;
