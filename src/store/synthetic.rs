//! Synthetic image source.
//!
//! Produces deterministic gradient planes without any hardware. Each snap
//! shifts the gradient so that consecutive planes differ, which makes it easy
//! to tell cached planes from freshly generated ones.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SourceError;
use crate::image::RawPlane;
use crate::metadata::Metadata;

use super::source::ImageSource;

/// Camera name reported in synthetic metadata.
pub const SYNTHETIC_CAMERA: &str = "Synthetic";

/// Default exposure reported for synthetic planes.
const DEFAULT_EXPOSURE_MS: f64 = 10.0;

/// Image source that fabricates gradient planes.
///
/// # Example
///
/// ```
/// use plane_store::store::{ImageSource, SyntheticSource};
///
/// #[tokio::main]
/// async fn main() {
///     let source = SyntheticSource::new(8, 4).with_pixel_format(1, 3);
///     let plane = source.snap().await.unwrap();
///     assert_eq!(plane.pixels.len(), 8 * 4 * 3);
///     assert_eq!(source.snap_count(), 1);
/// }
/// ```
#[derive(Debug)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    num_components: usize,
    exposure_ms: f64,
    /// Fail every Nth snap; 0 disables failures
    fail_every: u64,
    snaps: AtomicU64,
}

impl SyntheticSource {
    /// A 16-bit single-component source of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel: 2,
            num_components: 1,
            exposure_ms: DEFAULT_EXPOSURE_MS,
            fail_every: 0,
            snaps: AtomicU64::new(0),
        }
    }

    /// Set bytes per sample and the number of interleaved components.
    pub fn with_pixel_format(mut self, bytes_per_pixel: usize, num_components: usize) -> Self {
        self.bytes_per_pixel = bytes_per_pixel;
        self.num_components = num_components;
        self
    }

    pub fn with_exposure_ms(mut self, exposure_ms: f64) -> Self {
        self.exposure_ms = exposure_ms;
        self
    }

    /// Make every `n`th snap fail with [`SourceError::Unavailable`].
    pub fn with_failure_every(mut self, n: u64) -> Self {
        self.fail_every = n;
        self
    }

    /// Number of snaps attempted so far, failed ones included.
    pub fn snap_count(&self) -> u64 {
        self.snaps.load(Ordering::SeqCst)
    }

    fn render(&self, seq: u64) -> Bytes {
        let max = if self.bytes_per_pixel == 1 {
            u64::from(u8::MAX)
        } else {
            u64::from(u16::MAX)
        };
        let len = self.width as usize
            * self.height as usize
            * self.bytes_per_pixel
            * self.num_components;
        let mut buf = Vec::with_capacity(len);

        for y in 0..u64::from(self.height) {
            for x in 0..u64::from(self.width) {
                for c in 0..self.num_components as u64 {
                    let value = (x * 3 + y * 5 + seq * 7 + c * 31) % (max + 1);
                    match self.bytes_per_pixel {
                        1 => buf.push(value as u8),
                        _ => buf.extend_from_slice(&(value as u16).to_le_bytes()),
                    }
                }
            }
        }

        Bytes::from(buf)
    }
}

#[async_trait]
impl ImageSource for SyntheticSource {
    async fn snap(&self) -> Result<RawPlane, SourceError> {
        let seq = self.snaps.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_every > 0 && seq % self.fail_every == 0 {
            return Err(SourceError::Unavailable(format!(
                "simulated failure on snap {}",
                seq
            )));
        }

        let metadata = Metadata::builder()
            .camera(SYNTHETIC_CAMERA)
            .exposure_ms(self.exposure_ms)
            .elapsed_time_ms(self.exposure_ms * seq as f64)
            .bit_depth(8 * self.bytes_per_pixel as u32)
            .binning(1)
            .image_number(seq)
            .build();

        Ok(RawPlane {
            pixels: self.render(seq),
            width: self.width,
            height: self.height,
            bytes_per_pixel: self.bytes_per_pixel,
            num_components: self.num_components,
            metadata,
        })
    }
}
