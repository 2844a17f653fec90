//! The caching image store.
//!
//! [`ImageStore`] answers "give me the image at these coordinates" whether or
//! not the image exists yet. Misses are materialized through the
//! [`ImageSource`] and cached for the lifetime of the store:
//!
//! ```text
//!   get_image(coords)
//!        │
//!        ├── cached? ──────────────────────────────► return image
//!        │
//!        ▼
//!   in flight for coords? ── yes ── wait for leader ► same result
//!        │ no
//!        ▼
//!   source.snap() ── err ── log, map unchanged ────► Err(StoreError)
//!        │ ok
//!        ▼
//!   insert image + raise per-axis maxima (one write) ► return image
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, warn};

use crate::coords::Coords;
use crate::error::StoreError;
use crate::image::Image;
use crate::metadata::{Color, DisplaySettings, SummaryMetadata};

use super::events::SummaryReceiver;
use super::source::ImageSource;

// =============================================================================
// Catalog
// =============================================================================

/// Cached images plus the running per-axis maximum.
///
/// Both live behind one lock so that no reader can see an image without the
/// maximum that accounts for it.
#[derive(Debug, Default)]
struct Catalog {
    images: HashMap<Coords, Image>,
    max_index: Coords,
}

impl Catalog {
    /// Store `image` under its own coordinates and raise the maxima for every
    /// axis it carries.
    fn insert(&mut self, image: Image) -> Option<Image> {
        let coords = image.coords().clone();

        let mut raised = self.max_index.copy();
        let mut changed = false;
        for (axis, index) in coords.iter() {
            let above = self
                .max_index
                .position_at(axis)
                .map_or(true, |max| index > max);
            if above {
                raised = raised.position(axis, index);
                changed = true;
            }
        }
        if changed {
            self.max_index = raised.build();
        }

        self.images.insert(coords, image)
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters describing how requests were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Requests answered from the cache
    pub hits: u64,

    /// Requests that had to call the image source
    pub misses: u64,

    /// Misses where the source failed or produced an unusable plane
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

// =============================================================================
// ImageStore
// =============================================================================

/// State for an in-flight materialization.
struct InFlightState {
    /// Notification for waiters
    notify: Notify,
    /// Result of the snap (set when complete)
    result: Mutex<Option<Result<Image, StoreError>>>,
    /// Set when the leader went away without finishing
    abandoned: AtomicBool,
}

impl InFlightState {
    fn new() -> Self {
        Self {
            notify: Notify::new(),
            result: Mutex::new(None),
            abandoned: AtomicBool::new(false),
        }
    }
}

/// Marks the in-flight entry abandoned if the leader's future is dropped
/// before it finishes, and wakes the waiters so one of them takes over.
///
/// `Drop` cannot take the async `in_flight` lock, so the stale entry stays in
/// the map until the next request for the same coords replaces it.
struct LeaderGuard<'a> {
    state: &'a InFlightState,
    done: bool,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state.abandoned.store(true, Ordering::SeqCst);
            self.state.notify.notify_waiters();
        }
    }
}

/// Lazily populated, never-evicting map from coordinates to images.
///
/// # Example
///
/// ```
/// use plane_store::metadata::SummaryMetadata;
/// use plane_store::store::{summary_channel, ImageStore, SyntheticSource};
/// use plane_store::Coords;
///
/// #[tokio::main]
/// async fn main() {
///     let (_publisher, summary) = summary_channel(SummaryMetadata::default());
///     let store = ImageStore::new(SyntheticSource::new(16, 16), summary);
///
///     let coords = Coords::builder().z(2).channel(0).build();
///     let image = store.get_image(&coords).await.unwrap();
///
///     assert_eq!(image.coords(), &coords);
///     assert_eq!(store.get_max_index("z").await, Some(2));
/// }
/// ```
pub struct ImageStore<S: ImageSource> {
    /// Producer of new planes on a miss
    source: S,

    /// Cached images and per-axis maxima
    catalog: RwLock<Catalog>,

    /// In-flight misses for singleflight
    in_flight: Mutex<HashMap<Coords, Arc<InFlightState>>>,

    /// Latest dataset summary
    summary: SummaryReceiver,

    display_settings: DisplaySettings,

    counters: Counters,
}

impl<S: ImageSource> ImageStore<S> {
    /// Create a store with two-channel (red, green) display settings.
    pub fn new(source: S, summary: SummaryReceiver) -> Self {
        let display_settings = DisplaySettings::builder()
            .channel_colors([Color::RED, Color::GREEN])
            .build();
        Self::with_display_settings(source, summary, display_settings)
    }

    /// Create a store with explicit display settings.
    pub fn with_display_settings(
        source: S,
        summary: SummaryReceiver,
        display_settings: DisplaySettings,
    ) -> Self {
        Self {
            source,
            catalog: RwLock::new(Catalog::default()),
            in_flight: Mutex::new(HashMap::new()),
            summary,
            display_settings,
            counters: Counters::default(),
        }
    }

    /// Get the image at `coords`, generating it on first request.
    ///
    /// A cached image is returned without touching the source. On a miss the
    /// source is asked for one new plane, which is placed at `coords`, cached
    /// and returned. Concurrent misses for the same coordinates share a single
    /// snap. If the caller that is snapping is cancelled, a waiting caller
    /// takes over with a fresh snap.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the source fails or hands back a plane
    /// whose geometry is inconsistent. The failure is logged and the store is
    /// left exactly as it was, so a later call may try again.
    pub async fn get_image(&self, coords: &Coords) -> Result<Image, StoreError> {
        // Fast path: check cache
        if let Some(image) = self.cached(coords).await {
            return Ok(image);
        }

        // Slow path: wait on a live leader, or become one. A waiter loops back
        // here when its leader was cancelled before publishing a result.
        loop {
            let state = {
                let mut in_flight = self.in_flight.lock().await;

                let live = in_flight
                    .get(coords)
                    .filter(|state| !state.abandoned.load(Ordering::SeqCst))
                    .cloned();

                if let Some(state) = live {
                    // Another task is materializing these coords
                    state
                } else {
                    // A leader may have finished since the fast path
                    if let Some(image) = self.cached(coords).await {
                        return Ok(image);
                    }

                    // Replaces any entry left behind by a cancelled leader
                    let state = Arc::new(InFlightState::new());
                    in_flight.insert(coords.clone(), state.clone());
                    drop(in_flight);

                    return self.lead(coords, state).await;
                }
            };

            // Register interest before checking, so a notify between the
            // check and the await is not lost.
            let notified = state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let result_guard = state.result.lock().await;
                if let Some(ref result) = *result_guard {
                    return result.clone();
                }
            }
            if state.abandoned.load(Ordering::SeqCst) {
                continue;
            }

            notified.await;

            let result_guard = state.result.lock().await;
            if let Some(ref result) = *result_guard {
                return result.clone();
            }
        }
    }

    /// Every cached image whose coordinates match `pattern`, in no
    /// particular order. An empty pattern matches everything.
    pub async fn get_images_matching(&self, pattern: &Coords) -> Vec<Image> {
        let catalog = self.catalog.read().await;
        catalog
            .images
            .values()
            .filter(|image| image.coords().matches(pattern))
            .cloned()
            .collect()
    }

    /// Largest index seen along `axis`, or `None` if no cached image has it.
    pub async fn get_max_index(&self, axis: &str) -> Option<u32> {
        self.catalog.read().await.max_index.position_at(axis)
    }

    /// Every axis seen on any cached image, sorted.
    pub async fn get_axes(&self) -> Vec<String> {
        let catalog = self.catalog.read().await;
        catalog
            .max_index
            .axes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Snapshot of the per-axis maxima as a single coordinate.
    pub async fn max_coords(&self) -> Coords {
        self.catalog.read().await.max_index.clone()
    }

    /// The most recently published dataset summary.
    pub fn get_summary_metadata(&self) -> Arc<SummaryMetadata> {
        self.summary.current()
    }

    pub fn get_display_settings(&self) -> &DisplaySettings {
        &self.display_settings
    }

    /// Add an already existing image at its own coordinates.
    ///
    /// Returns the image previously stored there, if any.
    pub async fn insert(&self, image: Image) -> Option<Image> {
        debug!(coords = %image.coords(), "Inserting image");
        self.catalog.write().await.insert(image)
    }

    pub async fn contains(&self, coords: &Coords) -> bool {
        self.catalog.read().await.images.contains_key(coords)
    }

    /// Number of cached images.
    pub async fn len(&self) -> usize {
        self.catalog.read().await.images.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.catalog.read().await.images.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// The image source backing this store.
    pub fn source(&self) -> &S {
        &self.source
    }

    async fn cached(&self, coords: &Coords) -> Option<Image> {
        let image = self.catalog.read().await.images.get(coords).cloned()?;
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        debug!(%coords, "Cache hit");
        Some(image)
    }

    /// Materialize `coords` as the single leader for `state`, then hand the
    /// result to every waiter.
    async fn lead(
        &self,
        coords: &Coords,
        state: Arc<InFlightState>,
    ) -> Result<Image, StoreError> {
        let mut guard = LeaderGuard {
            state: state.as_ref(),
            done: false,
        };

        let result = self.materialize(coords).await;

        if let Ok(ref image) = result {
            self.catalog.write().await.insert(image.clone());
        }

        {
            let mut result_guard = state.result.lock().await;
            *result_guard = Some(result.clone());
        }

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight
                .get(coords)
                .is_some_and(|current| Arc::ptr_eq(current, &state))
            {
                in_flight.remove(coords);
            }
        }
        state.notify.notify_waiters();
        guard.done = true;

        result
    }

    /// Snap a new plane and place it at `coords`, without caching.
    async fn materialize(&self, coords: &Coords) -> Result<Image, StoreError> {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%coords, "Cache miss, snapping new image");

        let result = match self.source.snap().await {
            Ok(plane) => plane.into_image(coords.clone()).map_err(StoreError::from),
            Err(e) => Err(StoreError::from(e)),
        };

        if let Err(ref e) = result {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            warn!(%coords, error = %e, "Failed to generate a new image");
        }
        result
    }
}

// =============================================================================
// Tests
// =============================================================================
