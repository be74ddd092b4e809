//! Data a store is built from at startup.
//!
//! The built-in demo set is used unless `SEED_FILE` / `--seed` points at a TOML
//! document of the form:
//!
//! ```toml
//! [profile]
//! username = "kshitij"
//! channelId = "UC-kshitij"
//! subscriptions = ["UC-one", "UC-two"]
//!
//! [[videos]]
//! videoId = "abc123"
//! title = "First upload"
//!
//! [[videos.comments]]
//! user = "alice"
//! commentedOn = "2023-01-01"
//! data = "nice"
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Comment, UserProfile, Video};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    pub profile: UserProfile,
    #[serde(default)]
    pub videos: Vec<Video>,
}

impl Seed {
    pub fn demo() -> Self {
        let comment = |user: &str, commented_on: &str, data: &str| Comment {
            user: Some(Value::from(user)),
            commented_on: Some(Value::from(commented_on)),
            data: Some(Value::from(data)),
            is_edited: None,
        };

        Self {
            profile: UserProfile {
                username: "kshitij".into(),
                channel_id: "UCkshitij01".into(),
                subscriptions: vec![
                    "UCcodingtrain".into(),
                    "UCrustlang".into(),
                    "UCfireship".into(),
                ],
            },
            videos: vec![
                Video {
                    video_id: "x7KqLmP2vA0".into(),
                    title: "Building a REST API from scratch".into(),
                    channel_id: Some("UCcodingtrain".into()),
                    description: Some("Routing, handlers and JSON in under an hour.".into()),
                    views: Some(15_420),
                    likes: Some(1_210),
                    uploaded_on: Some("2023-03-14".into()),
                    comments: vec![
                        comment("UCkshitij01", "2023-03-15", "Great walkthrough!"),
                        comment("UCviewer42", "2023-03-16", "Could you cover auth next?"),
                    ],
                },
                Video {
                    video_id: "Qe9TnR4sWb8".into(),
                    title: "Ownership explained".into(),
                    channel_id: Some("UCrustlang".into()),
                    description: None,
                    views: Some(98_001),
                    likes: Some(7_342),
                    uploaded_on: Some("2023-05-02".into()),
                    comments: vec![comment(
                        "UCviewer42",
                        "2023-05-03",
                        "Borrowing finally clicked.",
                    )],
                },
                Video {
                    video_id: "Zp3HcY8uJk1".into(),
                    title: "100 seconds of HTTP".into(),
                    channel_id: Some("UCfireship".into()),
                    description: Some("Verbs, status codes, headers.".into()),
                    views: Some(230_117),
                    likes: None,
                    uploaded_on: Some("2023-06-20".into()),
                    comments: Vec::new(),
                },
            ],
        }
    }
}

pub fn load_seed(path: &Path) -> Result<Seed> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading seed {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Parsing seed {}", path.display()))
}
