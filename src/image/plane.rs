use std::sync::Arc;

use bytes::Bytes;

use crate::coords::Coords;
use crate::error::ImageError;
use crate::metadata::Metadata;

use super::pixels::{deinterleave, read_sample, required_len};

// =============================================================================
// RawPlane
// =============================================================================

/// A freshly produced pixel buffer, before it has a position in a dataset.
///
/// This is what an [`ImageSource`](crate::store::ImageSource) hands back on
/// each snap. The geometry is not checked until it is turned into an
/// [`Image`].
#[derive(Debug, Clone)]
pub struct RawPlane {
    pub pixels: Bytes,
    pub width: u32,
    pub height: u32,
    /// Bytes per component sample (1 or 2)
    pub bytes_per_pixel: usize,
    pub num_components: usize,
    /// Metadata reported by the source alongside the pixels
    pub metadata: Metadata,
}

impl RawPlane {
    /// Place this plane at `coords`, validating its geometry.
    pub fn into_image(self, coords: Coords) -> Result<Image, ImageError> {
        Image::new(
            self.pixels,
            self.width,
            self.height,
            self.bytes_per_pixel,
            self.num_components,
            coords,
            self.metadata,
        )
    }
}

// =============================================================================
// Image
// =============================================================================

/// A single image plane with its coordinates and metadata.
///
/// Images are never modified. The `copy_*` methods build new images that
/// share the pixel buffer (and metadata, unless replaced) with the original,
/// so they cost a few reference-count bumps regardless of image size.
#[derive(Debug, Clone)]
pub struct Image {
    pixels: Bytes,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    num_components: usize,
    coords: Coords,
    metadata: Arc<Metadata>,
}

impl Image {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidGeometry`] for zero dimensions, sample
    /// widths other than 1 or 2 bytes, or zero components, and
    /// [`ImageError::BufferSizeMismatch`] when the buffer length is not
    /// `width * height * bytes_per_pixel * num_components`.
    pub fn new(
        pixels: impl Into<Bytes>,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
        num_components: usize,
        coords: Coords,
        metadata: Metadata,
    ) -> Result<Self, ImageError> {
        let pixels = pixels.into();
        let expected = required_len(width, height, bytes_per_pixel, num_components)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
            bytes_per_pixel,
            num_components,
            coords,
            metadata: Arc::new(metadata),
        })
    }

    /// The shared pixel buffer.
    ///
    /// Other images derived from this one may hold the same buffer.
    pub fn raw_pixels(&self) -> &Bytes {
        &self.pixels
    }

    /// A fresh buffer holding only `component`'s samples.
    ///
    /// For single-component images, component 0 yields a copy of the whole
    /// buffer. Multi-component images are de-interleaved.
    pub fn raw_pixels_for_component(&self, component: usize) -> Result<Bytes, ImageError> {
        self.check_component(component)?;

        if self.num_components == 1 {
            return Ok(Bytes::copy_from_slice(&self.pixels));
        }
        Ok(deinterleave(
            &self.pixels,
            self.bytes_per_pixel,
            self.num_components,
            component,
        ))
    }

    /// Same pixels and metadata, new coordinates.
    pub fn copy_at_coords(&self, coords: Coords) -> Image {
        Image {
            coords,
            ..self.clone()
        }
    }

    /// Same pixels and coordinates, new metadata.
    pub fn copy_with_metadata(&self, metadata: Metadata) -> Image {
        Image {
            metadata: Arc::new(metadata),
            ..self.clone()
        }
    }

    /// Same pixels, new coordinates and metadata.
    pub fn copy_with(&self, coords: Coords, metadata: Metadata) -> Image {
        Image {
            coords,
            metadata: Arc::new(metadata),
            ..self.clone()
        }
    }

    /// Intensity of component 0 at `(x, y)`.
    pub fn intensity_at(&self, x: u32, y: u32) -> Result<u64, ImageError> {
        self.component_intensity_at(x, y, 0)
    }

    /// Intensity of `component` at `(x, y)`.
    pub fn component_intensity_at(
        &self,
        x: u32,
        y: u32,
        component: usize,
    ) -> Result<u64, ImageError> {
        self.check_component(component)?;
        let offset = self.sample_offset(x, y)? + component * self.bytes_per_pixel;
        Ok(read_sample(&self.pixels, offset, self.bytes_per_pixel))
    }

    /// Human-readable pixel value: `"42"`, or `"[r/g/b]"` for multi-component
    /// images.
    pub fn intensity_string_at(&self, x: u32, y: u32) -> Result<String, ImageError> {
        let base = self.sample_offset(x, y)?;

        if self.num_components == 1 {
            return Ok(read_sample(&self.pixels, base, self.bytes_per_pixel).to_string());
        }

        let values: Vec<String> = (0..self.num_components)
            .map(|c| {
                read_sample(&self.pixels, base + c * self.bytes_per_pixel, self.bytes_per_pixel)
                    .to_string()
            })
            .collect();
        Ok(format!("[{}]", values.join("/")))
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// True when both images are backed by the same pixel storage.
    pub fn shares_pixels_with(&self, other: &Image) -> bool {
        self.pixels.as_ptr() == other.pixels.as_ptr() && self.pixels.len() == other.pixels.len()
    }

    /// True when both images hold the same metadata allocation.
    pub fn shares_metadata_with(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.metadata, &other.metadata)
    }

    /// Byte offset of the first sample of pixel `(x, y)`.
    fn sample_offset(&self, x: u32, y: u32) -> Result<usize, ImageError> {
        if x >= self.width || y >= self.height {
            return Err(ImageError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let pixel = y as usize * self.width as usize + x as usize;
        Ok(pixel * self.num_components * self.bytes_per_pixel)
    }

    fn check_component(&self, component: usize) -> Result<(), ImageError> {
        if component >= self.num_components {
            return Err(ImageError::InvalidComponent {
                component,
                num_components: self.num_components,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
