//! Immutable metadata records.
//!
//! Three value types travel alongside image planes:
//!
//! - [`Metadata`]: per-image acquisition details (camera, exposure, stage position)
//! - [`SummaryMetadata`]: dataset-wide details, replaced wholesale when the
//!   dataset owner publishes a new summary
//! - [`DisplaySettings`]: how the dataset should be rendered
//!
//! Each is built through a builder and never mutated afterwards. Use `copy()`
//! to start a builder from an existing value when a variant is needed.

mod display;
mod image;
mod summary;

pub use display::{Color, DisplaySettings, DisplaySettingsBuilder};
pub use image::{Metadata, MetadataBuilder};
pub use summary::{SummaryMetadata, SummaryMetadataBuilder};
