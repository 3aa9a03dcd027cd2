//! Persistence of Spiralling Cells runs.
//!
//! The codec is a pure transform between an [`ArchiveState`] and bytes; the
//! file helpers are a thin layer on top for callers that store archives on
//! disk.
//!
//! # File Format
//!
//! The `.spca` (Spiralling Cells Archive) format keeps the legacy field order
//! (state count, dimensions, cell size, neighbourhood, grid, iteration) in a
//! self-describing, fixed-width layout:
//!
//! ```text
//! Magic: "SPCA" (4 bytes)
//! Version: u16
//! Num states: u32
//! Width: u32
//! Height: u32
//! Cell size: u32
//! Neighbourhood: u8 length + UTF-8 tag ("von Neumann" | "Moore")
//! Grid: height * width bytes, row-major, one state per byte
//! Iteration: u64
//! ```
//!
//! All integers are little-endian. Nothing may follow the iteration field.

mod file;
mod format;

pub use file::{archive_filename, load_archive, save_archive, save_archive_in};
pub use format::{
    ARCHIVE_EXTENSION, ARCHIVE_MAGIC, ARCHIVE_PREFIX_SIZE, ARCHIVE_VERSION, ArchiveError,
    ArchiveSource, ArchiveState, decode, encode, encoded_len,
};
