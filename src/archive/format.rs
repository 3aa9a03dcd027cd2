//! Binary format definitions for Spiralling Cells archives.

use std::io::{self, Cursor, Read};

use crate::compute::{AutomatonError, Grid};
use crate::schema::{AutomatonConfig, ConfigError, Neighbourhood};

/// Magic bytes identifying a Spiralling Cells archive.
pub const ARCHIVE_MAGIC: &[u8; 4] = b"SPCA";

/// Current format version.
pub const ARCHIVE_VERSION: u16 = 1;

/// File extension used by the save helpers.
pub const ARCHIVE_EXTENSION: &str = "spca";

/// Which grid of a live engine an archive captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveSource {
    /// Current grid and iteration counter.
    #[default]
    Current,
    /// Restart target, stored with iteration 0.
    Initial,
}

impl ArchiveSource {
    /// Short name used in generated filenames.
    pub fn kind(self) -> &'static str {
        match self {
            ArchiveSource::Current => "current",
            ArchiveSource::Initial => "initial",
        }
    }
}

/// Everything needed to rebuild an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveState {
    pub config: AutomatonConfig,
    pub grid: Grid,
    pub iteration: u64,
}

/// Archive decoding and file errors.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Invalid archive magic bytes {0:?}")]
    BadMagic([u8; 4]),
    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u16),
    #[error("Archive is truncated")]
    Truncated,
    #[error("Archive has {0} unexpected trailing bytes")]
    TrailingBytes(usize),
    #[error("Archive configuration is invalid: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Neighbourhood tag is not valid UTF-8")]
    InvalidTag,
    #[error("Unknown neighbourhood tag '{0}'")]
    UnknownNeighbourhood(String),
    #[error("Cell ({row}, {col}) holds state {value}, outside [0, {num_states})")]
    CellOutOfRange {
        row: usize,
        col: usize,
        value: u8,
        num_states: usize,
    },
    #[error("Archive state rejected: {0}")]
    Rejected(#[from] AutomatonError),
    #[error("Archive I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Fixed-size prefix before the neighbourhood tag.
/// Magic(4) + Version(2) + NumStates(4) + Width(4) + Height(4) + CellSize(4) = 22
pub const ARCHIVE_PREFIX_SIZE: usize = 22;

/// Exact encoded size of a state.
pub fn encoded_len(state: &ArchiveState) -> usize {
    ARCHIVE_PREFIX_SIZE + 1 + state.config.neighbourhood.tag().len() + state.grid.len() + 8
}

/// Encode an archive state.
///
/// Field order: num_states, width, height, cell_size, neighbourhood, grid,
/// iteration. All integers are little-endian.
pub fn encode(state: &ArchiveState) -> Vec<u8> {
    let config = &state.config;
    let tag = config.neighbourhood.tag().as_bytes();

    let mut bytes = Vec::with_capacity(encoded_len(state));
    bytes.extend_from_slice(ARCHIVE_MAGIC);
    bytes.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
    bytes.extend_from_slice(&field_u32(config.num_states).to_le_bytes());
    bytes.extend_from_slice(&field_u32(config.width).to_le_bytes());
    bytes.extend_from_slice(&field_u32(config.height).to_le_bytes());
    bytes.extend_from_slice(&field_u32(config.cell_size).to_le_bytes());
    bytes.push(tag.len() as u8);
    bytes.extend_from_slice(tag);
    bytes.extend_from_slice(state.grid.as_slice());
    bytes.extend_from_slice(&state.iteration.to_le_bytes());
    bytes
}

/// Decode an archive produced by [`encode`].
///
/// Every declared dimension must match the payload exactly and every cell
/// must lie in `[0, num_states)`; nothing is clamped.
pub fn decode(bytes: &[u8]) -> Result<ArchiveState, ArchiveError> {
    let mut r = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    read_exact(&mut r, &mut magic)?;
    if &magic != ARCHIVE_MAGIC {
        return Err(ArchiveError::BadMagic(magic));
    }

    let mut buf1 = [0u8; 1];
    let mut buf2 = [0u8; 2];
    let mut buf4 = [0u8; 4];
    let mut buf8 = [0u8; 8];

    read_exact(&mut r, &mut buf2)?;
    let version = u16::from_le_bytes(buf2);
    if version != ARCHIVE_VERSION {
        return Err(ArchiveError::UnsupportedVersion(version));
    }

    read_exact(&mut r, &mut buf4)?;
    let num_states = u32::from_le_bytes(buf4) as usize;

    read_exact(&mut r, &mut buf4)?;
    let width = u32::from_le_bytes(buf4) as usize;

    read_exact(&mut r, &mut buf4)?;
    let height = u32::from_le_bytes(buf4) as usize;

    read_exact(&mut r, &mut buf4)?;
    let cell_size = u32::from_le_bytes(buf4) as usize;

    read_exact(&mut r, &mut buf1)?;
    let mut tag = vec![0u8; usize::from(buf1[0])];
    read_exact(&mut r, &mut tag)?;
    let tag = String::from_utf8(tag).map_err(|_| ArchiveError::InvalidTag)?;
    let neighbourhood =
        Neighbourhood::from_tag(&tag).ok_or(ArchiveError::UnknownNeighbourhood(tag))?;

    let config = AutomatonConfig {
        width,
        height,
        num_states,
        neighbourhood,
        cell_size,
    };
    config.validate()?;

    // Check the payload is present before allocating for it.
    let cells_len = config.grid_size();
    let remaining = bytes.len() - r.position() as usize;
    if remaining < cells_len {
        return Err(ArchiveError::Truncated);
    }
    let mut cells = vec![0u8; cells_len];
    read_exact(&mut r, &mut cells)?;
    if let Some(i) = cells.iter().position(|&v| usize::from(v) >= num_states) {
        return Err(ArchiveError::CellOutOfRange {
            row: i / width,
            col: i % width,
            value: cells[i],
            num_states,
        });
    }
    let grid = Grid::from_cells(width, height, cells)?;

    read_exact(&mut r, &mut buf8)?;
    let iteration = u64::from_le_bytes(buf8);

    let trailing = bytes.len() - r.position() as usize;
    if trailing != 0 {
        return Err(ArchiveError::TrailingBytes(trailing));
    }

    Ok(ArchiveState {
        config,
        grid,
        iteration,
    })
}

/// Saturates for out-of-range values so that encoding never panics;
/// `decode` rejects the resulting archive.
fn field_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), ArchiveError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ArchiveError::Truncated,
        _ => ArchiveError::Io(e),
    })
}
