//! Image planes.
//!
//! An [`Image`] pairs a raw pixel buffer with its position ([`Coords`]) and
//! acquisition [`Metadata`]. Pixel buffers are [`bytes::Bytes`], so copies
//! made with [`Image::copy_at_coords`] and friends share the same storage and
//! never duplicate pixel data.
//!
//! # Pixel layout
//!
//! Samples are unsigned little-endian integers of `bytes_per_pixel` bytes,
//! interleaved by component:
//!
//! ```text
//! offset(x, y, c) = ((y * width + x) * num_components + c) * bytes_per_pixel
//! ```
//!
//! [`Coords`]: crate::coords::Coords
//! [`Metadata`]: crate::metadata::Metadata

mod pixels;
mod plane;

pub use pixels::{MAX_BYTES_PER_PIXEL, MIN_BYTES_PER_PIXEL};
pub use plane::{Image, RawPlane};
