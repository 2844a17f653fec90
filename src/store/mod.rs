//! Lazy image store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                 Caller                  │
//! └────────────────────┬────────────────────┘
//!                      │ get_image / get_images_matching
//!                      ▼
//! ┌─────────────────────────────────────────┐      ┌──────────────────┐
//! │               ImageStore                │◄─────│ SummaryPublisher │
//! │  (coords → image, per-axis maxima)      │      │ (dataset owner)  │
//! └────────────────────┬────────────────────┘      └──────────────────┘
//!                      │ on miss
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ImageSource Trait             │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │ SyntheticSource │    │ camera / instrument │
//! └─────────────────┘    └─────────────────────┘
//! ```

mod events;
mod reader;
mod source;
mod synthetic;

pub use events::{summary_channel, SummaryPublisher, SummaryReceiver};
pub use reader::{ImageStore, StoreStats};
pub use source::ImageSource;
pub use synthetic::{SyntheticSource, SYNTHETIC_CAMERA};
