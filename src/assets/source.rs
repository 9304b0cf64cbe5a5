use std::future::Future;

use rustc_hash::FxHashMap;

use crate::animation::clip::ClipData;
use crate::errors::{Result, StriderError};

/// Produces skeletal clip data for an asset location.
///
/// Decoding the actual animation format is the implementor's business; the
/// animation core only sees channels and a duration.
pub trait ClipSource {
    fn load_skeletal_clip(&self, url: &str) -> impl Future<Output = Result<ClipData>>;
}

/// Clip source backed by clips already in memory, keyed by url.
///
/// Used by hosts that decode assets themselves and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipSource {
    clips: FxHashMap<String, ClipData>,
}

impl MemoryClipSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, clip: ClipData) {
        self.clips.insert(url.into(), clip);
    }

    #[must_use]
    pub fn with_clip(mut self, url: impl Into<String>, clip: ClipData) -> Self {
        self.insert(url, clip);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl ClipSource for MemoryClipSource {
    async fn load_skeletal_clip(&self, url: &str) -> Result<ClipData> {
        self.clips
            .get(url)
            .cloned()
            .ok_or_else(|| StriderError::AssetLoad {
                url: url.to_string(),
                reason: "no such asset".to_string(),
            })
    }
}
