//! # Plane Store
//!
//! An in-process store that serves 2D image planes addressed by multi-axis
//! coordinates, together with per-image and per-dataset metadata.
//!
//! Callers ask for the image at a coordinate and do not need to know whether
//! it already existed: on first request the store asks an [`ImageSource`]
//! (a camera, or the bundled [`SyntheticSource`]) for a new plane, places it
//! at the requested coordinate and caches it for good.
//!
//! ## Architecture
//!
//! - [`coords`] - Multi-axis coordinates with wildcard matching
//! - [`image`] - Image planes with shared pixel buffers
//! - [`metadata`] - Immutable per-image, per-dataset and display records
//! - [`store`] - The caching store, image sources and summary delivery
//! - [`config`] - CLI configuration for the demo binary
//!
//! ## Example
//!
//! ```rust
//! use plane_store::metadata::SummaryMetadata;
//! use plane_store::store::{summary_channel, ImageStore, SyntheticSource};
//! use plane_store::Coords;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (publisher, summary) = summary_channel(SummaryMetadata::default());
//!     let store = ImageStore::new(SyntheticSource::new(32, 32), summary);
//!
//!     for z in 0..3 {
//!         let coords = Coords::builder().time(0).z(z).build();
//!         store.get_image(&coords).await.unwrap();
//!     }
//!
//!     let stack = store
//!         .get_images_matching(&Coords::builder().time(0).build())
//!         .await;
//!     assert_eq!(stack.len(), 3);
//!     assert_eq!(store.get_max_index("z").await, Some(2));
//!
//!     publisher.publish(SummaryMetadata::builder().name("z-stack").build());
//!     assert_eq!(store.get_summary_metadata().name.as_deref(), Some("z-stack"));
//! }
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod image;
pub mod metadata;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use coords::{Coords, CoordsBuilder, CHANNEL, STAGE_POSITION, TIME, Z};
pub use error::{CoordsError, ImageError, SourceError, StoreError};
pub use image::{Image, RawPlane};
pub use metadata::{Color, DisplaySettings, Metadata, SummaryMetadata};
pub use store::{
    summary_channel, ImageSource, ImageStore, StoreStats, SummaryPublisher, SummaryReceiver,
    SyntheticSource,
};
