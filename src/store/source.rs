//! The image source consulted on a cache miss.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::image::RawPlane;

/// Something that can produce a brand-new image plane on request.
///
/// In a live system this snaps the camera; in tests and demos it can be a
/// [`SyntheticSource`](super::SyntheticSource). The store calls
/// [`snap`](Self::snap) at most once per distinct coordinate and never
/// retries or times out the call itself.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Produce one fresh plane together with its acquisition metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when no plane can be produced right now.
    async fn snap(&self) -> Result<RawPlane, SourceError>;
}

#[async_trait]
impl<T: ImageSource + ?Sized> ImageSource for Arc<T> {
    async fn snap(&self) -> Result<RawPlane, SourceError> {
        (**self).snap().await
    }
}
