//! Archive files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use super::format::{ARCHIVE_EXTENSION, ArchiveError, ArchiveSource, ArchiveState, decode, encode};
use crate::schema::AutomatonConfig;

/// Build an archive filename:
/// `SpirallingCells_<kind>_<stamp>_<num_states>_<cell_size>_<width>_<height>.spca`.
pub fn archive_filename(source: ArchiveSource, config: &AutomatonConfig, stamp: &str) -> String {
    format!(
        "SpirallingCells_{}_{}_{}_{}_{}_{}.{}",
        source.kind(),
        stamp,
        config.num_states,
        config.cell_size,
        config.width,
        config.height,
        ARCHIVE_EXTENSION
    )
}

/// Write an archive to `path`.
pub fn save_archive<P: AsRef<Path>>(path: P, state: &ArchiveState) -> Result<(), ArchiveError> {
    let path = path.as_ref();
    let bytes = encode(state);
    fs::write(path, &bytes)?;
    log::info!(
        "Saved {}x{} archive at iteration {} to {} ({} bytes)",
        state.config.width,
        state.config.height,
        state.iteration,
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// Write an archive into `dir` under a generated name and return its path.
pub fn save_archive_in<P: AsRef<Path>>(
    dir: P,
    source: ArchiveSource,
    state: &ArchiveState,
    stamp: &str,
) -> Result<PathBuf, ArchiveError> {
    let path = dir
        .as_ref()
        .join(archive_filename(source, &state.config, stamp));
    save_archive(&path, state)?;
    Ok(path)
}

/// Read and decode an archive from `path`.
pub fn load_archive<P: AsRef<Path>>(path: P) -> Result<ArchiveState, ArchiveError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}
