//! Automaton engine - owns the grid and drives evolution.
//!
//! Each generation a cell advances to `(state + 1) mod N` if any cell in its
//! neighbourhood currently holds that next state. The rule reads only the
//! previous generation: the new grid is built in a separate buffer and the
//! two buffers are swapped once every cell has been computed.

use rayon::prelude::*;

use crate::archive::{ArchiveError, ArchiveSource, ArchiveState, decode};
use crate::schema::{AutomatonConfig, ConfigError, Neighbourhood, Pattern, Seed};

use super::Grid;

/// Errors raised by engine construction and coordinate-level queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    #[error("{cells} cells cannot form a {width}x{height} grid")]
    GridShapeMismatch {
        width: usize,
        height: usize,
        cells: usize,
    },
    #[error("Row {row} has {len} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("Grid is {found:?} (width, height) but configuration expects {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Cell ({row}, {col}) holds state {value}, outside [0, {num_states})")]
    CellOutOfRange {
        row: usize,
        col: usize,
        value: u8,
        num_states: usize,
    },
}

/// Cyclic cellular automaton on a toroidal grid.
#[derive(Debug, Clone)]
pub struct Automaton {
    config: AutomatonConfig,
    grid: Grid,
    /// Restart target.
    initial_grid: Grid,
    /// Pre-allocated buffer for the next generation (reused each step).
    next: Grid,
    iteration: u64,
}

impl Automaton {
    /// Create a new automaton with uniformly random cells.
    ///
    /// With `Some(seed)` the initial grid is reproducible; with `None` the
    /// generator is seeded from OS entropy.
    pub fn new(config: AutomatonConfig, seed: Option<u64>) -> Result<Self, AutomatonError> {
        Self::from_seed(config, &Seed::random(seed))
    }

    /// Create a new automaton from a seed specification.
    pub fn from_seed(config: AutomatonConfig, seed: &Seed) -> Result<Self, AutomatonError> {
        Self::from_pattern(config, &seed.pattern)
    }

    /// Create a new automaton from an initialization pattern.
    pub fn from_pattern(config: AutomatonConfig, pattern: &Pattern) -> Result<Self, AutomatonError> {
        config.validate()?;
        let grid = Grid::from_rows(&pattern.generate(&config))?;
        Self::from_grid(config, grid)
    }

    /// Create a new automaton with explicit grid contents.
    ///
    /// The grid must match the configured dimensions and every cell must lie
    /// in `[0, num_states)`.
    pub fn from_grid(config: AutomatonConfig, grid: Grid) -> Result<Self, AutomatonError> {
        config.validate()?;
        check_grid(&config, &grid)?;

        log::debug!(
            "Automaton created: {}x{} grid, {} states, {} neighbourhood",
            config.width,
            config.height,
            config.num_states,
            config.neighbourhood
        );

        Ok(Self {
            next: Grid::new(config.width, config.height),
            initial_grid: grid.clone(),
            grid,
            config,
            iteration: 0,
        })
    }

    /// Rebuild an engine from a decoded archive.
    ///
    /// The archived grid becomes both the current grid and the restart target.
    pub fn from_archive(state: ArchiveState) -> Result<Self, AutomatonError> {
        let mut automaton = Self::from_grid(state.config, state.grid)?;
        automaton.iteration = state.iteration;
        Ok(automaton)
    }

    /// Capture the current or initial state for persistence.
    ///
    /// An initial-state archive always carries iteration 0.
    pub fn to_archive(&self, source: ArchiveSource) -> ArchiveState {
        let (grid, iteration) = match source {
            ArchiveSource::Current => (self.grid.clone(), self.iteration),
            ArchiveSource::Initial => (self.initial_grid.clone(), 0),
        };
        ArchiveState {
            config: self.config.clone(),
            grid,
            iteration,
        }
    }

    /// Replace this engine with the state decoded from `bytes`.
    ///
    /// Decoding happens into a fresh candidate; on any failure `self` is left
    /// exactly as it was.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), ArchiveError> {
        let candidate = Self::from_archive(decode(bytes)?)?;
        log::debug!(
            "Loaded {}x{} archive at iteration {}",
            candidate.config.width,
            candidate.config.height,
            candidate.iteration
        );
        *self = candidate;
        Ok(())
    }

    /// Redraw a fresh random grid with the same configuration.
    ///
    /// The new grid becomes the restart target and the counter resets to 0.
    pub fn reseed(&mut self, seed: Option<u64>) -> Result<(), AutomatonError> {
        *self = Self::new(self.config.clone(), seed)?;
        Ok(())
    }

    /// Configuration reference.
    pub fn config(&self) -> &AutomatonConfig {
        &self.config
    }

    /// Grid width (columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.config.width
    }

    /// Grid height (rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.config.height
    }

    /// Number of cyclic states.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.config.num_states
    }

    /// Number of completed steps since construction, restart or load.
    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Read-only view of the current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read-only view of the restart target.
    pub fn initial_grid(&self) -> &Grid {
        &self.initial_grid
    }

    /// Independent copy of the current grid.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    /// Cell value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<u8, AutomatonError> {
        self.grid
            .get(row, col)
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    /// Reset the grid to the initial grid and the counter to 0.
    pub fn restart(&mut self) {
        self.grid.clone_from(&self.initial_grid);
        self.iteration = 0;
        log::debug!("Automaton restarted");
    }

    /// Advance one generation using `neighbourhood`. Returns the new iteration count.
    pub fn step(&mut self, neighbourhood: Neighbourhood) -> u64 {
        let width = self.config.width;
        let num_states = self.config.num_states;
        let offsets = neighbourhood.offsets();
        let current = &self.grid;

        // Each row of the new grid is written by exactly one task; all reads
        // go to the previous generation.
        self.next
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, out)| {
                for (col, cell) in out.iter_mut().enumerate() {
                    *cell = next_state(current, row, col, num_states, offsets);
                }
            });

        std::mem::swap(&mut self.grid, &mut self.next);
        self.iteration += 1;
        log::trace!("Step {} ({})", self.iteration, neighbourhood);
        self.iteration
    }

    /// Advance one generation using the configured neighbourhood.
    pub fn step_configured(&mut self) -> u64 {
        self.step(self.config.neighbourhood)
    }

    /// Run for the specified number of steps with the configured neighbourhood.
    pub fn run(&mut self, steps: u64) -> u64 {
        for _ in 0..steps {
            self.step_configured();
        }
        self.iteration
    }

    /// Wrapped coordinates of the neighbours of (row, col), in offset-table order.
    pub fn neighbours(
        &self,
        row: usize,
        col: usize,
        neighbourhood: Neighbourhood,
    ) -> Result<Vec<(usize, usize)>, AutomatonError> {
        self.check_bounds(row, col)?;
        Ok(neighbourhood
            .offsets()
            .iter()
            .map(|&(dr, dc)| self.grid.wrap(row, col, dr, dc))
            .collect())
    }

    /// Minimum circular state distance between (row, col) and any of its neighbours.
    pub fn min_neighbour_distance(
        &self,
        row: usize,
        col: usize,
        neighbourhood: Neighbourhood,
    ) -> Result<u32, AutomatonError> {
        self.check_bounds(row, col)?;
        Ok(min_distance_at(
            &self.grid,
            row,
            col,
            self.config.num_states,
            neighbourhood.offsets(),
        ))
    }

    /// Mean minimum-neighbour distance over every cell.
    ///
    /// 0 for a uniform grid, at most `num_states / 2`.
    pub fn entropy(&self, neighbourhood: Neighbourhood) -> f64 {
        let grid = &self.grid;
        let width = grid.width();
        let num_states = self.config.num_states;
        let offsets = neighbourhood.offsets();

        let total: u64 = (0..grid.height())
            .into_par_iter()
            .map(|row| {
                (0..width)
                    .map(|col| u64::from(min_distance_at(grid, row, col, num_states, offsets)))
                    .sum::<u64>()
            })
            .sum();

        total as f64 / grid.len() as f64
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), AutomatonError> {
        if row < self.config.height && col < self.config.width {
            Ok(())
        } else {
            Err(self.out_of_bounds(row, col))
        }
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> AutomatonError {
        AutomatonError::OutOfBounds {
            row,
            col,
            height: self.config.height,
            width: self.config.width,
        }
    }
}

/// Validate grid shape and cell range against a configuration.
pub(crate) fn check_grid(config: &AutomatonConfig, grid: &Grid) -> Result<(), AutomatonError> {
    if grid.width() != config.width || grid.height() != config.height {
        return Err(AutomatonError::DimensionMismatch {
            expected: (config.width, config.height),
            found: (grid.width(), grid.height()),
        });
    }
    if let Some(i) = grid
        .as_slice()
        .iter()
        .position(|&v| usize::from(v) >= config.num_states)
    {
        return Err(AutomatonError::CellOutOfRange {
            row: i / config.width,
            col: i % config.width,
            value: grid.as_slice()[i],
            num_states: config.num_states,
        });
    }
    Ok(())
}

/// Circular distance between two states modulo `num_states`.
#[inline]
pub fn circular_distance(a: u8, b: u8, num_states: usize) -> u32 {
    let n = num_states as i64;
    let d = (i64::from(a) - i64::from(b)).rem_euclid(n);
    d.min(n - d) as u32
}

/// State of (row, col) in the next generation.
#[inline]
fn next_state(
    grid: &Grid,
    row: usize,
    col: usize,
    num_states: usize,
    offsets: &[(i32, i32)],
) -> u8 {
    let cells = grid.as_slice();
    let value = cells[grid.idx(row, col)];
    let target = ((usize::from(value) + 1) % num_states) as u8;

    let has_target = offsets.iter().any(|&(dr, dc)| {
        let (r, c) = grid.wrap(row, col, dr, dc);
        cells[grid.idx(r, c)] == target
    });

    if has_target { target } else { value }
}

#[inline]
fn min_distance_at(
    grid: &Grid,
    row: usize,
    col: usize,
    num_states: usize,
    offsets: &[(i32, i32)],
) -> u32 {
    let cells = grid.as_slice();
    let value = cells[grid.idx(row, col)];
    offsets
        .iter()
        .map(|&(dr, dc)| {
            let (r, c) = grid.wrap(row, col, dr, dc);
            circular_distance(value, cells[grid.idx(r, c)], num_states)
        })
        .min()
        .unwrap_or(0)
}

/// Automaton statistics for monitoring.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AutomatonStats {
    pub iteration: u64,
    /// Mean minimum-neighbour distance.
    pub entropy: f64,
    /// Number of cells in each state, indexed by state.
    pub state_counts: Vec<usize>,
    /// Number of states with at least one cell.
    pub distinct_states: usize,
}

impl AutomatonStats {
    /// Compute statistics from the current grid.
    pub fn from_automaton(automaton: &Automaton, neighbourhood: Neighbourhood) -> Self {
        let mut state_counts = vec![0usize; automaton.num_states()];
        for &v in automaton.grid().as_slice() {
            state_counts[usize::from(v)] += 1;
        }
        let distinct_states = state_counts.iter().filter(|&&c| c > 0).count();

        Self {
            iteration: automaton.iteration(),
            entropy: automaton.entropy(neighbourhood),
            state_counts,
            distinct_states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::encode;
    use proptest::prelude::*;

    fn config(width: usize, height: usize, num_states: usize) -> AutomatonConfig {
        AutomatonConfig::new(width, height, num_states, Neighbourhood::VonNeumann)
    }

    fn from_rows(cfg: AutomatonConfig, rows: &[Vec<u8>]) -> Automaton {
        Automaton::from_grid(cfg, Grid::from_rows(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_seeded_construction_is_deterministic() {
        let a = Automaton::new(config(20, 15, 8), Some(1234)).unwrap();
        let b = Automaton::new(config(20, 15, 8), Some(1234)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.iteration(), 0);
        assert_eq!(a.grid(), a.initial_grid());
        assert!(a.grid().as_slice().iter().all(|&v| v < 8));
    }

    #[test]
    fn test_seeded_grid_is_stable() {
        let automaton = Automaton::new(config(6, 4, 8), Some(1234)).unwrap();
        assert_eq!(
            automaton.grid().to_rows(),
            vec![
                vec![0, 0, 7, 1, 2, 4],
                vec![5, 3, 5, 5, 7, 0],
                vec![7, 3, 6, 7, 7, 6],
                vec![6, 0, 5, 5, 7, 2],
            ]
        );
    }

    #[test]
    fn test_oversized_configuration_is_rejected() {
        let huge = AutomatonConfig::new(u32::MAX as usize, u32::MAX as usize, 2, Neighbourhood::VonNeumann);
        assert!(matches!(
            Automaton::from_pattern(huge, &Pattern::Uniform { state: 0 }),
            Err(AutomatonError::InvalidConfiguration(ConfigError::DimensionTooLarge { .. }))
        ));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            Automaton::new(config(0, 3, 4), Some(1)),
            Err(AutomatonError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Automaton::new(config(3, 3, 1), Some(1)),
            Err(AutomatonError::InvalidConfiguration(
                ConfigError::InvalidStateCount(1)
            ))
        ));
    }

    #[test]
    fn test_from_grid_validation() {
        let grid = Grid::from_rows(&[vec![0, 1], vec![1, 0]]).unwrap();
        assert!(matches!(
            Automaton::from_grid(config(3, 2, 2), grid.clone()),
            Err(AutomatonError::DimensionMismatch { .. })
        ));

        let bad = Grid::from_rows(&[vec![0, 1], vec![2, 0]]).unwrap();
        assert_eq!(
            Automaton::from_grid(config(2, 2, 2), bad).unwrap_err(),
            AutomatonError::CellOutOfRange {
                row: 1,
                col: 0,
                value: 2,
                num_states: 2
            }
        );

        assert!(Automaton::from_grid(config(2, 2, 2), grid).is_ok());
    }

    #[test]
    fn test_uniform_pattern_out_of_range() {
        let result = Automaton::from_pattern(config(3, 3, 4), &Pattern::Uniform { state: 4 });
        assert!(matches!(result, Err(AutomatonError::CellOutOfRange { .. })));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let automaton = Automaton::new(config(4, 4, 3), Some(5)).unwrap();
        let mut snap = automaton.snapshot();
        let before = automaton.snapshot();
        snap.set(0, 0, (snap.get(0, 0).unwrap() + 1) % 3);
        assert_eq!(automaton.snapshot(), before);
        assert_ne!(snap, before);
    }

    #[test]
    fn test_von_neumann_wraparound_3x3() {
        let automaton = Automaton::from_pattern(config(3, 3, 4), &Pattern::Uniform { state: 0 })
            .unwrap();
        let mut n = automaton
            .neighbours(0, 0, Neighbourhood::VonNeumann)
            .unwrap();
        n.sort_unstable();
        assert_eq!(n, vec![(0, 1), (0, 2), (1, 0), (2, 0)]);

        let mut m = automaton.neighbours(0, 0, Neighbourhood::Moore).unwrap();
        m.sort_unstable();
        assert_eq!(
            m,
            vec![
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );

        assert!(matches!(
            automaton.neighbours(3, 0, Neighbourhood::VonNeumann),
            Err(AutomatonError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_wraparound_advances_edge_cell() {
        // Only neighbour holding the next state sits across the top edge.
        let mut automaton = from_rows(
            config(3, 3, 4),
            &[vec![0, 2, 2], vec![2, 2, 2], vec![1, 2, 2]],
        );
        automaton.step(Neighbourhood::VonNeumann);
        assert_eq!(automaton.get(0, 0), Ok(1));
    }

    #[test]
    fn test_uniform_grid_is_fixed_point() {
        let mut automaton =
            Automaton::from_pattern(config(5, 4, 6), &Pattern::Uniform { state: 3 }).unwrap();
        let before = automaton.snapshot();
        assert_eq!(automaton.step(Neighbourhood::Moore), 1);
        assert_eq!(automaton.snapshot(), before);
        assert_eq!(automaton.step(Neighbourhood::VonNeumann), 2);
        assert_eq!(automaton.snapshot(), before);
    }

    #[test]
    fn test_checkerboard_period_two() {
        let mut automaton =
            Automaton::from_pattern(config(6, 4, 2), &Pattern::Checkerboard).unwrap();
        let original = automaton.snapshot();

        automaton.step(Neighbourhood::VonNeumann);
        let flipped = automaton.snapshot();
        for (a, b) in original.as_slice().iter().zip(flipped.as_slice()) {
            assert_eq!(*b, 1 - *a);
        }

        automaton.step(Neighbourhood::VonNeumann);
        assert_eq!(automaton.snapshot(), original);
        assert_eq!(automaton.iteration(), 2);
    }

    #[test]
    fn test_end_to_end_4x4() {
        let cfg = config(4, 4, 2);
        let mut automaton = from_rows(
            cfg,
            &[
                vec![0, 1, 0, 1],
                vec![1, 0, 1, 0],
                vec![0, 1, 0, 1],
                vec![1, 0, 1, 0],
            ],
        );
        let iteration = automaton.step(Neighbourhood::VonNeumann);
        assert_eq!(iteration, 1);
        assert_eq!(
            automaton.snapshot().to_rows(),
            vec![
                vec![1, 0, 1, 0],
                vec![0, 1, 0, 1],
                vec![1, 0, 1, 0],
                vec![0, 1, 0, 1],
            ]
        );
    }

    #[test]
    fn test_step_reads_previous_generation() {
        // Evaluated in place left to right, col 2 would see the freshly
        // advanced col 1 and advance as well, which in turn would stop col 3.
        let mut automaton = from_rows(config(5, 1, 4), &[vec![1, 0, 0, 3, 3]]);
        automaton.step(Neighbourhood::VonNeumann);
        assert_eq!(automaton.snapshot().to_rows(), vec![vec![1, 1, 0, 0, 3]]);
    }

    #[test]
    fn test_cyclic_wrap_of_states() {
        // Highest state advances to 0.
        let mut automaton = from_rows(config(2, 1, 3), &[vec![2, 0]]);
        automaton.step(Neighbourhood::VonNeumann);
        assert_eq!(automaton.snapshot().to_rows(), vec![vec![0, 0]]);
    }

    #[test]
    fn test_moore_sees_diagonals() {
        let rows = [vec![0, 3, 3], vec![3, 3, 3], vec![3, 3, 1]];
        let mut vn = from_rows(config(3, 3, 4), &rows);
        vn.step(Neighbourhood::VonNeumann);
        assert_eq!(vn.get(0, 0), Ok(0));

        let mut moore = from_rows(config(3, 3, 4), &rows);
        moore.step(Neighbourhood::Moore);
        // (2,2) is the diagonal neighbour of (0,0) across both edges.
        assert_eq!(moore.get(0, 0), Ok(1));
    }

    #[test]
    fn test_restart_restores_initial() {
        let mut automaton = Automaton::new(config(16, 16, 5), Some(99)).unwrap();
        let initial = automaton.snapshot();
        automaton.run(10);
        assert_eq!(automaton.iteration(), 10);

        automaton.restart();
        assert_eq!(automaton.snapshot(), initial);
        assert_eq!(automaton.iteration(), 0);

        automaton.restart();
        assert_eq!(automaton.snapshot(), initial);
        assert_eq!(automaton.iteration(), 0);
    }

    #[test]
    fn test_reseed() {
        let mut automaton = Automaton::new(config(8, 8, 4), Some(1)).unwrap();
        automaton.run(3);
        automaton.reseed(Some(2)).unwrap();
        let expected = Automaton::new(config(8, 8, 4), Some(2)).unwrap();
        assert_eq!(automaton.snapshot(), expected.snapshot());
        assert_eq!(automaton.initial_grid(), expected.initial_grid());
        assert_eq!(automaton.iteration(), 0);
    }

    #[test]
    fn test_circular_distance() {
        assert_eq!(circular_distance(0, 0, 8), 0);
        assert_eq!(circular_distance(0, 7, 8), 1);
        assert_eq!(circular_distance(7, 0, 8), 1);
        assert_eq!(circular_distance(0, 4, 8), 4);
        assert_eq!(circular_distance(1, 6, 8), 3);
        assert_eq!(circular_distance(0, 2, 5), 2);
        assert_eq!(circular_distance(255, 0, 256), 1);
    }

    #[test]
    fn test_min_neighbour_distance() {
        let automaton = from_rows(
            config(3, 3, 8),
            &[vec![0, 3, 5], vec![4, 4, 4], vec![6, 4, 4]],
        );
        // Neighbours of (0,0): (0,1)=3, (0,2)=5, (1,0)=4, (2,0)=6 -> distances 3,3,4,2.
        assert_eq!(
            automaton.min_neighbour_distance(0, 0, Neighbourhood::VonNeumann),
            Ok(2)
        );
        // Moore adds (1,1)=4, (1,2)=4, (2,1)=4, (2,2)=4: still 2.
        assert_eq!(
            automaton.min_neighbour_distance(0, 0, Neighbourhood::Moore),
            Ok(2)
        );
        assert_eq!(
            automaton.min_neighbour_distance(1, 1, Neighbourhood::VonNeumann),
            Ok(0)
        );
        assert!(matches!(
            automaton.min_neighbour_distance(0, 3, Neighbourhood::VonNeumann),
            Err(AutomatonError::OutOfBounds {
                row: 0,
                col: 3,
                height: 3,
                width: 3
            })
        ));
    }

    #[test]
    fn test_entropy_uniform_is_zero() {
        let automaton =
            Automaton::from_pattern(config(7, 5, 12), &Pattern::Uniform { state: 11 }).unwrap();
        assert_eq!(automaton.entropy(Neighbourhood::VonNeumann), 0.0);
        assert_eq!(automaton.entropy(Neighbourhood::Moore), 0.0);
    }

    #[test]
    fn test_entropy_checkerboard() {
        // Every von Neumann neighbour differs by 1; Moore diagonals match.
        let automaton = Automaton::from_pattern(config(4, 4, 2), &Pattern::Checkerboard).unwrap();
        assert_eq!(automaton.entropy(Neighbourhood::VonNeumann), 1.0);
        assert_eq!(automaton.entropy(Neighbourhood::Moore), 0.0);
    }

    #[test]
    fn test_stats() {
        let automaton = from_rows(config(3, 2, 4), &[vec![0, 0, 1], vec![1, 1, 3]]);
        let stats = AutomatonStats::from_automaton(&automaton, Neighbourhood::VonNeumann);
        assert_eq!(stats.iteration, 0);
        assert_eq!(stats.state_counts, vec![2, 3, 0, 1]);
        assert_eq!(stats.distinct_states, 3);
        assert_eq!(stats.entropy, automaton.entropy(Neighbourhood::VonNeumann));
    }

    #[test]
    fn test_archive_current_and_initial() {
        let mut automaton = Automaton::new(config(6, 5, 4), Some(3)).unwrap();
        automaton.run(4);

        let current = automaton.to_archive(ArchiveSource::Current);
        assert_eq!(current.iteration, 4);
        assert_eq!(&current.grid, automaton.grid());

        let initial = automaton.to_archive(ArchiveSource::Initial);
        assert_eq!(initial.iteration, 0);
        assert_eq!(&initial.grid, automaton.initial_grid());

        let restored = Automaton::from_archive(current).unwrap();
        assert_eq!(restored.snapshot(), automaton.snapshot());
        assert_eq!(restored.iteration(), 4);
        assert_eq!(restored.initial_grid(), automaton.grid());
    }

    #[test]
    fn test_load_swaps_on_success() {
        let mut source = Automaton::new(config(5, 5, 6), Some(10)).unwrap();
        source.run(7);
        let bytes = encode(&source.to_archive(ArchiveSource::Current));

        let mut target = Automaton::new(config(3, 3, 2), Some(11)).unwrap();
        target.load(&bytes).unwrap();
        assert_eq!(target.config(), source.config());
        assert_eq!(target.snapshot(), source.snapshot());
        assert_eq!(target.iteration(), 7);

        target.restart();
        assert_eq!(target.snapshot(), source.snapshot());
        assert_eq!(target.iteration(), 0);
    }

    #[test]
    fn test_failed_load_leaves_engine_untouched() {
        let source = Automaton::new(config(5, 5, 6), Some(10)).unwrap();
        let bytes = encode(&source.to_archive(ArchiveSource::Current));

        let mut target = Automaton::new(config(4, 4, 3), Some(12)).unwrap();
        target.run(2);
        let before = target.snapshot();

        assert!(target.load(&bytes[..bytes.len() - 1]).is_err());
        assert_eq!(target.snapshot(), before);
        assert_eq!(target.iteration(), 2);
        assert_eq!(target.config().width, 4);
    }

    proptest! {
        #[test]
        fn entropy_is_bounded(
            width in 1usize..12,
            height in 1usize..12,
            num_states in 2usize..17,
            seed in any::<u64>(),
            moore in any::<bool>(),
        ) {
            let nbhd = if moore { Neighbourhood::Moore } else { Neighbourhood::VonNeumann };
            let automaton = Automaton::new(config(width, height, num_states), Some(seed)).unwrap();
            let entropy = automaton.entropy(nbhd);
            prop_assert!(entropy >= 0.0);
            prop_assert!(entropy <= num_states as f64 / 2.0);
        }

        #[test]
        fn step_only_advances_by_one(
            width in 1usize..10,
            height in 1usize..10,
            num_states in 2usize..9,
            seed in any::<u64>(),
        ) {
            let mut automaton = Automaton::new(config(width, height, num_states), Some(seed)).unwrap();
            let before = automaton.snapshot();
            automaton.step(Neighbourhood::Moore);
            let after = automaton.snapshot();
            for (&a, &b) in before.as_slice().iter().zip(after.as_slice()) {
                prop_assert!(b == a || usize::from(b) == (usize::from(a) + 1) % num_states);
            }
        }

        #[test]
        fn restart_after_steps(seed in any::<u64>(), steps in 0u64..20) {
            let mut automaton = Automaton::new(config(9, 7, 5), Some(seed)).unwrap();
            let initial = automaton.snapshot();
            automaton.run(steps);
            automaton.restart();
            prop_assert_eq!(automaton.snapshot(), initial);
            prop_assert_eq!(automaton.iteration(), 0);
        }
    }
}
