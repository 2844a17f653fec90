//! Configuration for the `plane-store` demo binary.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks using the `PLANE_` prefix:
//!
//! - `PLANE_WIDTH` / `PLANE_HEIGHT` - Plane size in pixels (default: 64x64)
//! - `PLANE_BYTES_PER_PIXEL` - Bytes per sample, 1 or 2 (default: 2)
//! - `PLANE_COMPONENTS` - Interleaved components per pixel (default: 1)
//! - `PLANE_EXTENT` - Highest index per axis to request (default: time=1,channel=1,z=2)
//! - `PLANE_PATTERN` - Pattern to query after acquisition (default: none)
//! - `PLANE_FAIL_EVERY` - Make every Nth snap fail, 0 disables (default: 0)
//! - `PLANE_EXPOSURE_MS` - Exposure reported in metadata (default: 10)
//!
//! # Example
//!
//! ```ignore
//! use plane_store::config::Config;
//!
//! let config = Config::parse();
//! for coords in config.planned_coords() {
//!     println!("{}", coords);
//! }
//! ```

use clap::Parser;

use crate::coords::Coords;
use crate::image::{MAX_BYTES_PER_PIXEL, MIN_BYTES_PER_PIXEL};

// =============================================================================
// Default Values
// =============================================================================

/// Default plane width in pixels.
pub const DEFAULT_WIDTH: u32 = 64;

/// Default plane height in pixels.
pub const DEFAULT_HEIGHT: u32 = 64;

/// Default bytes per sample.
pub const DEFAULT_BYTES_PER_PIXEL: usize = 2;

/// Default number of components per pixel.
pub const DEFAULT_COMPONENTS: usize = 1;

/// Default acquisition extent (highest index per axis).
pub const DEFAULT_EXTENT: &str = "time=1,channel=1,z=2";

/// Default exposure in milliseconds.
pub const DEFAULT_EXPOSURE_MS: f64 = 10.0;

/// Largest supported number of components per pixel.
pub const MAX_COMPONENTS: usize = 4;

/// Upper bound on the number of planes one run may request.
pub const MAX_PLANES: u64 = 10_000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// plane-store - serve image planes from a lazily populated store.
///
/// Requests every coordinate within the extent from a store backed by a
/// synthetic camera, then reports the per-axis maxima and the planes
/// matching an optional pattern.
#[derive(Parser, Debug, Clone)]
#[command(name = "plane-store")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Plane Geometry
    // =========================================================================
    /// Plane width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH, env = "PLANE_WIDTH")]
    pub width: u32,

    /// Plane height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, env = "PLANE_HEIGHT")]
    pub height: u32,

    /// Bytes per sample (1 or 2).
    #[arg(long, default_value_t = DEFAULT_BYTES_PER_PIXEL, env = "PLANE_BYTES_PER_PIXEL")]
    pub bytes_per_pixel: usize,

    /// Interleaved components per pixel (3 for RGB).
    #[arg(long, default_value_t = DEFAULT_COMPONENTS, env = "PLANE_COMPONENTS")]
    pub components: usize,

    // =========================================================================
    // Acquisition
    // =========================================================================
    /// Highest index to request along each axis, e.g. "time=3,z=9".
    #[arg(long, default_value = DEFAULT_EXTENT, env = "PLANE_EXTENT")]
    pub extent: Coords,

    /// Pattern to query once every plane has been requested, e.g. "channel=0".
    #[arg(long, env = "PLANE_PATTERN")]
    pub pattern: Option<Coords>,

    /// Make every Nth snap fail (0 = never).
    #[arg(long, default_value_t = 0, env = "PLANE_FAIL_EVERY")]
    pub fail_every: u64,

    /// Exposure time reported in image metadata.
    #[arg(long, default_value_t = DEFAULT_EXPOSURE_MS, env = "PLANE_EXPOSURE_MS")]
    pub exposure_ms: f64,

    // =========================================================================
    // Output
    // =========================================================================
    /// Print the final report as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be greater than 0".to_string());
        }

        if !(MIN_BYTES_PER_PIXEL..=MAX_BYTES_PER_PIXEL).contains(&self.bytes_per_pixel) {
            return Err(format!(
                "bytes_per_pixel must be between {} and {}",
                MIN_BYTES_PER_PIXEL, MAX_BYTES_PER_PIXEL
            ));
        }

        if self.components == 0 || self.components > MAX_COMPONENTS {
            return Err(format!(
                "components must be between 1 and {}",
                MAX_COMPONENTS
            ));
        }

        if !(self.exposure_ms.is_finite() && self.exposure_ms >= 0.0) {
            return Err("exposure_ms must be a non-negative number".to_string());
        }

        if self.plane_count() > MAX_PLANES {
            return Err(format!(
                "extent '{}' requests {} planes, more than the limit of {}",
                self.extent,
                self.plane_count(),
                MAX_PLANES
            ));
        }

        Ok(())
    }

    /// Number of planes within the extent.
    pub fn plane_count(&self) -> u64 {
        self.extent
            .iter()
            .fold(1u64, |acc, (_, max)| acc.saturating_mul(u64::from(max) + 1))
    }

    /// Every coordinate within the extent, last axis varying fastest.
    ///
    /// An empty extent yields a single empty coordinate.
    pub fn planned_coords(&self) -> Vec<Coords> {
        let mut planned = vec![Coords::default()];
        for (axis, max) in self.extent.iter() {
            planned = planned
                .iter()
                .flat_map(|base| (0..=max).map(move |index| base.position(axis, index)))
                .collect();
        }
        planned
    }
}

// =============================================================================
// Tests
// =============================================================================
