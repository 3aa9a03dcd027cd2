//! Seed types for initializing Spiralling Cells grids.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AutomatonConfig, MAX_STATES};

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Every cell drawn independently and uniformly from `[0, num_states)`.
    Random {
        /// Generator seed. `None` draws from OS entropy.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Every cell holds the same state.
    Uniform {
        /// State value.
        state: u8,
    },
    /// Alternating 0/1 cells, `(row + col) mod 2`.
    Checkerboard,
    /// Vertical bands cycling through all states.
    Stripes {
        /// Band width in cells (0 is treated as 1).
        period: usize,
    },
    /// Explicit grid contents, row-major.
    Custom {
        /// One entry per row, each `width` long.
        rows: Vec<Vec<u8>>,
    },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Random { seed: None }
    }
}

impl Seed {
    /// Seed with uniformly random cells.
    pub fn random(seed: Option<u64>) -> Self {
        Self {
            pattern: Pattern::Random { seed },
        }
    }

    /// Generate initial grid rows from seed.
    ///
    /// Shape and value range are not checked here; `Grid::from_rows` and the
    /// engine constructors reject rows that do not fit the configuration.
    pub fn generate(&self, config: &AutomatonConfig) -> Vec<Vec<u8>> {
        self.pattern.generate(config)
    }
}

impl Pattern {
    /// Generate initial grid rows for the given configuration.
    pub fn generate(&self, config: &AutomatonConfig) -> Vec<Vec<u8>> {
        let width = config.width;
        let height = config.height;
        let num_states = config.num_states.max(1);

        match self {
            Pattern::Random { seed } => {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(*s),
                    None => StdRng::from_entropy(),
                };
                random_rows(&mut rng, width, height, num_states)
            }
            Pattern::Uniform { state } => vec![vec![*state; width]; height],
            Pattern::Checkerboard => (0..height)
                .map(|row| (0..width).map(|col| ((row + col) % 2) as u8).collect())
                .collect(),
            Pattern::Stripes { period } => {
                let period = (*period).max(1);
                (0..height)
                    .map(|_| {
                        (0..width)
                            .map(|col| ((col / period) % num_states) as u8)
                            .collect()
                    })
                    .collect()
            }
            Pattern::Custom { rows } => rows.clone(),
        }
    }
}

/// Fill `height` rows of `width` cells uniformly from `[0, num_states)`.
fn random_rows<R: Rng>(
    rng: &mut R,
    width: usize,
    height: usize,
    num_states: usize,
) -> Vec<Vec<u8>> {
    // u16 draws consume one u32 per sample on every target, unlike usize.
    let num_states = num_states.min(MAX_STATES) as u16;
    (0..height)
        .map(|_| {
            (0..width)
                .map(|_| rng.gen_range(0..num_states) as u8)
                .collect()
        })
        .collect()
}
