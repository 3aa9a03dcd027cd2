//! Configuration types for Spiralling Cells runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest supported state count (cells are stored as `u8`).
pub const MAX_STATES: usize = 256;

/// Largest supported width, height and cell size (archives store them as `u32`).
pub const MAX_DIMENSION: usize = u32::MAX as usize;

/// Largest supported total cell count (width * height).
pub const MAX_CELLS: usize = 1 << 28;

fn default_num_states() -> usize {
    8
}

fn default_cell_size() -> usize {
    2
}

/// Neighbourhood topology used when looking for a "+1" neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Neighbourhood {
    /// 4-connected: the cardinal directions.
    #[default]
    #[serde(rename = "von Neumann", alias = "VonNeumann")]
    VonNeumann,
    /// 8-connected: cardinal directions plus diagonals.
    #[serde(rename = "Moore")]
    Moore,
}

impl Neighbourhood {
    /// Human-readable tag, also used in archives.
    pub fn tag(self) -> &'static str {
        match self {
            Neighbourhood::VonNeumann => "von Neumann",
            Neighbourhood::Moore => "Moore",
        }
    }

    /// Parse an archive tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "von Neumann" => Some(Neighbourhood::VonNeumann),
            "Moore" => Some(Neighbourhood::Moore),
            _ => None,
        }
    }
}

impl fmt::Display for Neighbourhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Neighbourhood {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ConfigError::UnknownNeighbourhood(s.to_string()))
    }
}

/// Immutable configuration of one automaton run.
///
/// Changing any field means building a new engine; a live engine never has
/// its dimensions or state count altered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonConfig {
    /// Grid width in cells (columns).
    pub width: usize,
    /// Grid height in cells (rows).
    pub height: usize,
    /// Number of cyclic states; cells hold values in `[0, num_states)`.
    #[serde(default = "default_num_states")]
    pub num_states: usize,
    /// Neighbourhood used by the configured step.
    #[serde(default)]
    pub neighbourhood: Neighbourhood,
    /// Side length of a drawn cell in pixels. Carried through archives,
    /// never read by the engine.
    #[serde(default = "default_cell_size")]
    pub cell_size: usize,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            num_states: default_num_states(),
            neighbourhood: Neighbourhood::VonNeumann,
            cell_size: default_cell_size(),
        }
    }
}

impl AutomatonConfig {
    /// Convenience constructor with the default cell size.
    pub fn new(width: usize, height: usize, num_states: usize, neighbourhood: Neighbourhood) -> Self {
        Self {
            width,
            height,
            num_states,
            neighbourhood,
            cell_size: default_cell_size(),
        }
    }

    /// Total number of cells (width * height). Only meaningful once
    /// [`validate`](Self::validate) has passed.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let too_many_cells = self
            .width
            .checked_mul(self.height)
            .is_none_or(|cells| cells > MAX_CELLS);
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION || too_many_cells {
            return Err(ConfigError::DimensionTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.num_states < 2 || self.num_states > MAX_STATES {
            return Err(ConfigError::InvalidStateCount(self.num_states));
        }
        if self.cell_size == 0 || self.cell_size > MAX_DIMENSION {
            return Err(ConfigError::InvalidCellSize);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Grid dimensions {width}x{height} exceed the supported maximum of 2^28 cells")]
    DimensionTooLarge { width: usize, height: usize },
    #[error("State count must be between 2 and 256 (got {0})")]
    InvalidStateCount(usize),
    #[error("Cell size must be non-zero and fit in 32 bits")]
    InvalidCellSize,
    #[error("Unknown neighbourhood '{0}'")]
    UnknownNeighbourhood(String),
}
