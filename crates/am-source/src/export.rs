use std::path::Path;

use am_core::error::CoreError;
use am_core::frame::CharGrid;
use am_core::traits::ArtifactSink;

/// Écrit les artefacts sur le système de fichiers, en créant les dossiers parents.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSink;

impl ArtifactSink for FileSink {
    fn persist(&self, bytes: &[u8], dest: &Path) -> Result<(), CoreError> {
        persist_artifact(bytes, dest)
    }
}

fn io_error(dest: &Path, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: dest.display().to_string(),
        source,
    }
}

/// Write `bytes` to `dest`, creating missing parent directories.
///
/// # Errors
/// Returns [`CoreError::Io`] if a directory cannot be created or the write fails.
pub fn persist_artifact(bytes: &[u8], dest: &Path) -> Result<(), CoreError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    std::fs::write(dest, bytes).map_err(|e| io_error(dest, e))?;
    log::debug!("Artefact écrit : {} ({} octets)", dest.display(), bytes.len());
    Ok(())
}

/// Persist a grid in the plain-text format (one glyph per cell, `\n` rows).
///
/// # Errors
/// Returns [`CoreError::Io`] if the write fails.
///
/// # Example
/// ```no_run
/// use am_core::frame::CharGrid;
/// use am_source::export::write_grid;
/// write_grid(&CharGrid::new(4, 2), "out/art.txt".as_ref()).unwrap();
/// ```
pub fn write_grid(grid: &CharGrid, dest: &Path) -> Result<(), CoreError> {
    persist_artifact(grid.to_text().as_bytes(), dest)
}

/// Read a persisted grid back.
///
/// # Errors
/// Returns [`CoreError::Io`] if the file cannot be read (or is not UTF-8) and
/// [`CoreError::Config`] if its rows are ragged.
pub fn read_grid(src: &Path) -> Result<CharGrid, CoreError> {
    let text = std::fs::read_to_string(src).map_err(|e| io_error(src, e))?;
    CharGrid::parse(&text)
}
