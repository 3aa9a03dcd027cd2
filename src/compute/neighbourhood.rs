//! Neighbourhood offset tables.
//!
//! Offsets are `(row_offset, col_offset)` pairs. The Moore table starts with
//! the von Neumann table, so a von Neumann neighbourhood is always a prefix.

use crate::schema::Neighbourhood;

/// 4-connected offsets: E, W, S, N.
pub const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// 8-connected offsets: the von Neumann offsets followed by the four diagonals.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Neighbourhood {
    /// Offset table for this neighbourhood.
    #[inline]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Neighbourhood::VonNeumann => &VON_NEUMANN_OFFSETS,
            Neighbourhood::Moore => &MOORE_OFFSETS,
        }
    }

    /// Number of neighbours per cell.
    #[inline]
    pub fn size(self) -> usize {
        self.offsets().len()
    }
}
