//! Shared helpers for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use plane_store::{
    summary_channel, Coords, ImageSource, ImageStore, Metadata, RawPlane, SourceError,
    SummaryMetadata, SummaryPublisher,
};

/// Source that serves scripted outcomes and counts how often it is asked.
///
/// Once the script runs out it produces 4x4 8-bit planes filled with the
/// snap number, until an optional limit is reached.
pub struct MockImageSource {
    snaps: AtomicUsize,
    script: Mutex<VecDeque<Result<RawPlane, SourceError>>>,
    limit: Option<usize>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self {
            snaps: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            limit: None,
        }
    }

    /// Report [`SourceError::Exhausted`] once `limit` snaps have been made.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Queue a failure for an upcoming snap.
    pub fn then_fail(mut self, reason: &str) -> Self {
        self.script
            .get_mut()
            .push_back(Err(SourceError::Unavailable(reason.to_string())));
        self
    }

    /// Queue a specific plane for an upcoming snap.
    pub fn then_plane(mut self, plane: RawPlane) -> Self {
        self.script.get_mut().push_back(Ok(plane));
        self
    }

    pub fn snap_count(&self) -> usize {
        self.snaps.load(Ordering::SeqCst)
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn snap(&self) -> Result<RawPlane, SourceError> {
        let n = self.snaps.fetch_add(1, Ordering::SeqCst) + 1;
        if self.limit.is_some_and(|limit| n > limit) {
            return Err(SourceError::Exhausted);
        }

        if let Some(outcome) = self.script.lock().await.pop_front() {
            return outcome;
        }
        Ok(gray_plane(4, 4, n as u8, n as u64))
    }
}

/// An 8-bit single-component plane filled with `fill`.
pub fn gray_plane(width: u32, height: u32, fill: u8, image_number: u64) -> RawPlane {
    RawPlane {
        pixels: Bytes::from(vec![fill; (width * height) as usize]),
        width,
        height,
        bytes_per_pixel: 1,
        num_components: 1,
        metadata: Metadata::builder()
            .camera("Mock")
            .image_number(image_number)
            .build(),
    }
}

/// Store over a shared mock source, plus the publisher feeding it summaries.
pub fn mock_store(
    source: MockImageSource,
) -> (
    ImageStore<Arc<MockImageSource>>,
    Arc<MockImageSource>,
    SummaryPublisher,
) {
    let source = Arc::new(source);
    let (publisher, summary) = summary_channel(SummaryMetadata::default());
    (ImageStore::new(source.clone(), summary), source, publisher)
}

/// Parse coordinate text, panicking on malformed input.
pub fn at(text: &str) -> Coords {
    text.parse().expect("valid coordinate text")
}
