//! In-memory video store.
//!
//! Nothing here touches the disk: a store is built once from a [`Seed`] and
//! lives for as long as the process does. The HTTP layer shares it behind a
//! `parking_lot::RwLock`, so mutations run one at a time.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Result, bail};
use parking_lot::RwLock;

use crate::{
    model::{UserProfile, Video},
    seed::Seed,
};

pub type SharedStore = Arc<RwLock<Store>>;

#[derive(Debug, Clone)]
pub struct Store {
    profile: UserProfile,
    videos: HashMap<String, Video>,
}

impl Store {
    /// Builds a store keyed by video id. Duplicate ids are rejected so that a
    /// lookup can never be ambiguous.
    pub fn new(profile: UserProfile, videos: impl IntoIterator<Item = Video>) -> Result<Self> {
        let mut map = HashMap::new();
        for video in videos {
            if map.contains_key(&video.video_id) {
                bail!("duplicate video id {:?} in seed data", video.video_id);
            }
            map.insert(video.video_id.clone(), video);
        }
        Ok(Self {
            profile,
            videos: map,
        })
    }

    pub fn from_seed(seed: Seed) -> Result<Self> {
        Self::new(seed.profile, seed.videos)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn video(&self, video_id: &str) -> Option<&Video> {
        self.videos.get(video_id)
    }

    pub fn video_mut(&mut self, video_id: &str) -> Option<&mut Video> {
        self.videos.get_mut(video_id)
    }

    pub fn videos(&self) -> impl Iterator<Item = &Video> {
        self.videos.values()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
