//! Rendering hints for a dataset.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a dataset's channels should be displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Color per channel index
    pub channel_colors: Vec<Color>,

    /// Lower end of the contrast range per channel
    pub channel_contrast_mins: Vec<u64>,

    /// Upper end of the contrast range per channel
    pub channel_contrast_maxes: Vec<u64>,

    pub magnification: Option<f64>,

    /// Playback speed when animating through an axis
    pub animation_fps: Option<f64>,
}

impl DisplaySettings {
    pub fn builder() -> DisplaySettingsBuilder {
        DisplaySettingsBuilder::default()
    }

    pub fn copy(&self) -> DisplaySettingsBuilder {
        DisplaySettingsBuilder {
            inner: self.clone(),
        }
    }

    /// Color for `channel`, if one was configured.
    pub fn channel_color(&self, channel: usize) -> Option<Color> {
        self.channel_colors.get(channel).copied()
    }
}

/// Builder for [`DisplaySettings`].
#[derive(Debug, Clone, Default)]
pub struct DisplaySettingsBuilder {
    inner: DisplaySettings,
}

impl DisplaySettingsBuilder {
    pub fn channel_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.inner.channel_colors = colors.into();
        self
    }

    pub fn channel_contrast_mins(mut self, mins: impl Into<Vec<u64>>) -> Self {
        self.inner.channel_contrast_mins = mins.into();
        self
    }

    pub fn channel_contrast_maxes(mut self, maxes: impl Into<Vec<u64>>) -> Self {
        self.inner.channel_contrast_maxes = maxes.into();
        self
    }

    pub fn magnification(mut self, magnification: f64) -> Self {
        self.inner.magnification = Some(magnification);
        self
    }

    pub fn animation_fps(mut self, fps: f64) -> Self {
        self.inner.animation_fps = Some(fps);
        self
    }

    pub fn build(self) -> DisplaySettings {
        self.inner
    }
}
