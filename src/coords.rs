//! Multi-axis coordinates for addressing image planes.
//!
//! A [`Coords`] assigns non-negative indices to named axes. Axes that are not
//! present are "unset". The same type serves as a storage key (a full
//! position) and as a query pattern, where unset axes act as wildcards.
//!
//! # Example
//!
//! ```
//! use plane_store::Coords;
//!
//! let coords = Coords::builder().time(3).channel(1).z(0).build();
//! let pattern = Coords::builder().channel(1).build();
//!
//! assert!(coords.matches(&pattern));
//! assert_eq!(coords.position_at("z"), Some(0));
//! assert_eq!(coords.position_at("position"), None);
//! assert_eq!(coords.to_string(), "channel=1,time=3,z=0");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoordsError;

/// Axis for time points.
pub const TIME: &str = "time";

/// Axis for channels.
pub const CHANNEL: &str = "channel";

/// Axis for focus (z) slices.
pub const Z: &str = "z";

/// Axis for stage positions.
pub const STAGE_POSITION: &str = "position";

// =============================================================================
// Coords
// =============================================================================

/// An immutable position along any number of named axes.
///
/// Cloning is cheap: the axis map is reference counted and never mutated.
/// Every "edit" goes through [`CoordsBuilder`] and produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Coords {
    positions: Arc<BTreeMap<String, u32>>,
}

impl Coords {
    /// Start building a new, empty coordinate.
    pub fn builder() -> CoordsBuilder {
        CoordsBuilder::default()
    }

    /// Start a builder seeded with this coordinate's axes.
    pub fn copy(&self) -> CoordsBuilder {
        CoordsBuilder {
            positions: self.positions.as_ref().clone(),
        }
    }

    /// Return a new coordinate with `axis` set to `index`.
    pub fn position(&self, axis: impl Into<String>, index: u32) -> Coords {
        self.copy().position(axis, index).build()
    }

    /// Index along `axis`, or `None` when the axis is unset.
    pub fn position_at(&self, axis: &str) -> Option<u32> {
        self.positions.get(axis).copied()
    }

    /// Names of the axes set on this coordinate, in sorted order.
    pub fn axes(&self) -> Vec<&str> {
        self.positions.keys().map(String::as_str).collect()
    }

    /// Iterate over `(axis, index)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.positions.iter().map(|(axis, &index)| (axis.as_str(), index))
    }

    /// Number of axes set.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no axis is set.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check whether this coordinate satisfies `pattern`.
    ///
    /// Every axis present in `pattern` must be present here with the same
    /// index. Axes missing from `pattern` match anything, so an empty pattern
    /// matches every coordinate.
    pub fn matches(&self, pattern: &Coords) -> bool {
        pattern
            .positions
            .iter()
            .all(|(axis, index)| self.positions.get(axis) == Some(index))
    }

    pub fn time(&self) -> Option<u32> {
        self.position_at(TIME)
    }

    pub fn channel(&self) -> Option<u32> {
        self.position_at(CHANNEL)
    }

    pub fn z(&self) -> Option<u32> {
        self.position_at(Z)
    }

    pub fn stage_position(&self) -> Option<u32> {
        self.position_at(STAGE_POSITION)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (axis, index)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", axis, index)?;
        }
        Ok(())
    }
}

impl FromStr for Coords {
    type Err = CoordsError;

    /// Parse `axis=index` pairs separated by commas. Whitespace around names
    /// and numbers is ignored; an empty string yields an empty coordinate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = Coords::builder();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (axis, value) = part.split_once('=').ok_or_else(|| CoordsError::Parse {
                input: s.to_string(),
                reason: format!("expected 'axis=index', got '{}'", part),
            })?;

            let index: i64 = value.trim().parse().map_err(|_| CoordsError::Parse {
                input: s.to_string(),
                reason: format!("'{}' is not an integer", value.trim()),
            })?;

            builder = builder.try_position(axis.trim(), index)?;
        }

        Ok(builder.build())
    }
}

/// Deserializes from an `{axis: index}` map, rejecting empty axis names the
/// same way [`FromStr`] does.
impl<'de> Deserialize<'de> for Coords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let positions = BTreeMap::<String, u32>::deserialize(deserializer)?;
        if positions.keys().any(String::is_empty) {
            return Err(serde::de::Error::custom(CoordsError::EmptyAxis));
        }
        Ok(Coords {
            positions: Arc::new(positions),
        })
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Accumulates `(axis, index)` pairs and produces a [`Coords`].
#[derive(Debug, Clone, Default)]
pub struct CoordsBuilder {
    positions: BTreeMap<String, u32>,
}

impl CoordsBuilder {
    /// Set `axis` to `index`, replacing any earlier value for that axis.
    pub fn position(mut self, axis: impl Into<String>, index: u32) -> Self {
        self.positions.insert(axis.into(), index);
        self
    }

    /// Like [`position`](Self::position), for indices of unchecked sign.
    ///
    /// Rejects negative indices, indices beyond `u32::MAX` and empty axis
    /// names.
    pub fn try_position(self, axis: impl Into<String>, index: i64) -> Result<Self, CoordsError> {
        let axis = axis.into();
        if axis.is_empty() {
            return Err(CoordsError::EmptyAxis);
        }
        if index < 0 {
            return Err(CoordsError::NegativeIndex { axis, index });
        }
        let index = u32::try_from(index).map_err(|_| CoordsError::IndexOverflow {
            axis: axis.clone(),
            index,
        })?;
        Ok(self.position(axis, index))
    }

    pub fn time(self, index: u32) -> Self {
        self.position(TIME, index)
    }

    pub fn channel(self, index: u32) -> Self {
        self.position(CHANNEL, index)
    }

    pub fn z(self, index: u32) -> Self {
        self.position(Z, index)
    }

    pub fn stage_position(self, index: u32) -> Self {
        self.position(STAGE_POSITION, index)
    }

    /// Remove `axis`, making it unset.
    pub fn remove(mut self, axis: &str) -> Self {
        self.positions.remove(axis);
        self
    }

    pub fn build(self) -> Coords {
        Coords {
            positions: Arc::new(self.positions),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
