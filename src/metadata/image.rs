//! Per-image acquisition metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Acquisition details for a single image plane.
///
/// Every field is optional; sources fill in what they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Camera that produced the plane
    pub camera: Option<String>,

    /// Exposure time in milliseconds
    pub exposure_ms: Option<f64>,

    /// Milliseconds since the start of the acquisition
    pub elapsed_time_ms: Option<f64>,

    /// Camera binning factor
    pub binning: Option<u32>,

    /// Significant bits per sample
    pub bit_depth: Option<u32>,

    /// Physical pixel size in micrometers
    pub pixel_size_um: Option<f64>,

    /// Stage X position in micrometers
    pub x_position_um: Option<f64>,

    /// Stage Y position in micrometers
    pub y_position_um: Option<f64>,

    /// Focus position in micrometers
    pub z_position_um: Option<f64>,

    /// Wall-clock time the plane was received, as reported by the source
    pub received_time: Option<String>,

    /// Running number assigned by the source
    pub image_number: Option<u64>,

    /// Free-form key/value annotations
    pub user_data: BTreeMap<String, String>,
}

impl Metadata {
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Start a builder seeded with this value.
    pub fn copy(&self) -> MetadataBuilder {
        MetadataBuilder {
            inner: self.clone(),
        }
    }
}

/// Builder for [`Metadata`].
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    inner: Metadata,
}

impl MetadataBuilder {
    pub fn camera(mut self, camera: impl Into<String>) -> Self {
        self.inner.camera = Some(camera.into());
        self
    }

    pub fn exposure_ms(mut self, exposure_ms: f64) -> Self {
        self.inner.exposure_ms = Some(exposure_ms);
        self
    }

    pub fn elapsed_time_ms(mut self, elapsed_time_ms: f64) -> Self {
        self.inner.elapsed_time_ms = Some(elapsed_time_ms);
        self
    }

    pub fn binning(mut self, binning: u32) -> Self {
        self.inner.binning = Some(binning);
        self
    }

    pub fn bit_depth(mut self, bit_depth: u32) -> Self {
        self.inner.bit_depth = Some(bit_depth);
        self
    }

    pub fn pixel_size_um(mut self, pixel_size_um: f64) -> Self {
        self.inner.pixel_size_um = Some(pixel_size_um);
        self
    }

    /// Set the stage position; pass `None` for axes the stage does not report.
    pub fn stage_position_um(mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        self.inner.x_position_um = x;
        self.inner.y_position_um = y;
        self.inner.z_position_um = z;
        self
    }

    pub fn received_time(mut self, received_time: impl Into<String>) -> Self {
        self.inner.received_time = Some(received_time.into());
        self
    }

    pub fn image_number(mut self, image_number: u64) -> Self {
        self.inner.image_number = Some(image_number);
        self
    }

    pub fn user_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.user_data.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Metadata {
        self.inner
    }
}
