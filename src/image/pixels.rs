//! Low-level sample access on interleaved pixel buffers.

use bytes::Bytes;

use crate::error::ImageError;

/// Narrowest supported sample (8-bit).
pub const MIN_BYTES_PER_PIXEL: usize = 1;

/// Widest supported sample (16-bit).
pub const MAX_BYTES_PER_PIXEL: usize = 2;

/// Check a geometry and return the buffer length it requires.
pub(crate) fn required_len(
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    num_components: usize,
) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidGeometry(format!(
            "dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    if !(MIN_BYTES_PER_PIXEL..=MAX_BYTES_PER_PIXEL).contains(&bytes_per_pixel) {
        return Err(ImageError::InvalidGeometry(format!(
            "unsupported bytes per pixel: {}",
            bytes_per_pixel
        )));
    }
    if num_components == 0 {
        return Err(ImageError::InvalidGeometry(
            "image must have at least one component".to_string(),
        ));
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bytes_per_pixel))
        .and_then(|n| n.checked_mul(num_components))
        .ok_or_else(|| ImageError::InvalidGeometry("image size overflows usize".to_string()))
}

/// Decode one unsigned sample starting at `offset`.
#[inline]
pub(crate) fn read_sample(buf: &[u8], offset: usize, bytes_per_pixel: usize) -> u64 {
    match bytes_per_pixel {
        1 => u64::from(buf[offset]),
        _ => u64::from(u16::from_le_bytes([buf[offset], buf[offset + 1]])),
    }
}

/// Copy out every sample of `component` into a new, tightly packed buffer.
pub(crate) fn deinterleave(
    buf: &[u8],
    bytes_per_pixel: usize,
    num_components: usize,
    component: usize,
) -> Bytes {
    let stride = bytes_per_pixel * num_components;
    let start = component * bytes_per_pixel;

    let mut out = Vec::with_capacity(buf.len() / num_components);
    for pixel in buf.chunks_exact(stride) {
        out.extend_from_slice(&pixel[start..start + bytes_per_pixel]);
    }
    Bytes::from(out)
}
