//! Dataset-wide summary metadata.

use serde::{Deserialize, Serialize};

use crate::coords::Coords;

/// Metadata describing a whole dataset rather than a single plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryMetadata {
    pub name: Option<String>,

    /// File-name prefix used when the dataset was acquired
    pub prefix: Option<String>,

    pub user_name: Option<String>,

    pub microscope: Option<String>,

    /// One name per channel index
    pub channel_names: Vec<String>,

    /// Spacing between z slices in micrometers
    pub z_step_um: Option<f64>,

    /// Requested interval between time points in milliseconds
    pub wait_interval_ms: Option<f64>,

    pub comments: Option<String>,

    pub start_date: Option<String>,

    /// Planned number of positions along each axis
    pub intended_dimensions: Coords,
}

impl SummaryMetadata {
    pub fn builder() -> SummaryMetadataBuilder {
        SummaryMetadataBuilder::default()
    }

    pub fn copy(&self) -> SummaryMetadataBuilder {
        SummaryMetadataBuilder {
            inner: self.clone(),
        }
    }
}

/// Builder for [`SummaryMetadata`].
#[derive(Debug, Clone, Default)]
pub struct SummaryMetadataBuilder {
    inner: SummaryMetadata,
}

impl SummaryMetadataBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.prefix = Some(prefix.into());
        self
    }

    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.inner.user_name = Some(user_name.into());
        self
    }

    pub fn microscope(mut self, microscope: impl Into<String>) -> Self {
        self.inner.microscope = Some(microscope.into());
        self
    }

    pub fn channel_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.channel_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn z_step_um(mut self, z_step_um: f64) -> Self {
        self.inner.z_step_um = Some(z_step_um);
        self
    }

    pub fn wait_interval_ms(mut self, wait_interval_ms: f64) -> Self {
        self.inner.wait_interval_ms = Some(wait_interval_ms);
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.inner.comments = Some(comments.into());
        self
    }

    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.inner.start_date = Some(start_date.into());
        self
    }

    pub fn intended_dimensions(mut self, dims: Coords) -> Self {
        self.inner.intended_dimensions = dims;
        self
    }

    pub fn build(self) -> SummaryMetadata {
        self.inner
    }
}
