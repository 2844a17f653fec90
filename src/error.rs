use thiserror::Error;

/// Errors raised while building or parsing coordinates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordsError {
    /// A negative index was supplied for an axis
    #[error("Negative index {index} for axis '{axis}'")]
    NegativeIndex { axis: String, index: i64 },

    /// Index does not fit in the coordinate index type
    #[error("Index {index} for axis '{axis}' exceeds {max}", max = u32::MAX)]
    IndexOverflow { axis: String, index: i64 },

    /// Axis names must be non-empty
    #[error("Axis name is empty")]
    EmptyAxis,

    /// Text form could not be parsed (expected `axis=index,axis=index`)
    #[error("Malformed coordinate '{input}': {reason}")]
    Parse { input: String, reason: String },
}

/// Errors related to image construction and pixel access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Pixel position lies outside the image
    #[error("Pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Component index outside `0..num_components`
    #[error("Invalid component {component}: image has {num_components} component(s)")]
    InvalidComponent {
        component: usize,
        num_components: usize,
    },

    /// Buffer length disagrees with the declared geometry
    #[error("Buffer size mismatch: geometry requires {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Geometry itself is unusable (zero dimensions, unsupported sample width)
    #[error("Invalid image geometry: {0}")]
    InvalidGeometry(String),
}

/// Errors reported by an image source when asked for a new plane
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source could not produce a plane right now
    #[error("Image source unavailable: {0}")]
    Unavailable(String),

    /// The source has no further planes to give
    #[error("Image source exhausted")]
    Exhausted,
}

/// Errors returned by [`crate::store::ImageStore`] on a cache miss
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The image source failed to produce a plane
    #[error("Failed to generate a new image: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// The source produced a plane that does not describe a valid image
    #[error("Image source produced an invalid plane: {0}")]
    InvalidPlane(#[from] ImageError),
}
