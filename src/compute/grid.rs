//! Toroidal grid storage.
//!
//! Cells are stored as a flat row-major `Vec<u8>`: index = `row * width + col`,
//! row 0 at the top.

use super::AutomatonError;

/// A `height x width` grid of cell states.
///
/// Cloning a grid yields an independent copy, which is what the engine hands
/// out as a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Build a grid from a flat row-major buffer.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, AutomatonError> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(AutomatonError::GridShapeMismatch {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from nested rows. Every row must have the same non-zero length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, AutomatonError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AutomatonError::RaggedRows {
                row,
                len: bad.len(),
                expected: width,
            });
        }
        let cells = rows.iter().flatten().copied().collect();
        Self::from_cells(width, height, cells)
    }

    /// Grid width (columns).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (rows).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (row, col) to flat index.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Cell value, or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.cells[self.idx(row, col)])
        } else {
            None
        }
    }

    /// Set a cell value. Returns false (and leaves the grid unchanged) outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> bool {
        if row < self.height && col < self.width {
            let idx = self.idx(row, col);
            self.cells[idx] = value;
            true
        } else {
            false
        }
    }

    /// Coordinate of the cell at offset `(dr, dc)` from `(row, col)`, wrapping
    /// around both edges.
    #[inline]
    pub fn wrap(&self, row: usize, col: usize, dr: i32, dc: i32) -> (usize, usize) {
        (
            wrap_coord(row as i64 + dr as i64, self.height),
            wrap_coord(col as i64 + dc as i64, self.width),
        )
    }

    /// Flat row-major cell slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable flat row-major cell slice.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Copy out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }
}

/// Wrap a signed coordinate onto `[0, size)`.
#[inline]
pub(crate) fn wrap_coord(coord: i64, size: usize) -> usize {
    coord.rem_euclid(size as i64) as usize
}
