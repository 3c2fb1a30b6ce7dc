use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use am_ascii::Variant;
use am_core::error::CoreError;
use am_core::traits::ArtifactSink;

/// Outcome of writing a gallery. Failed files do not stop the others.
#[derive(Debug, Default)]
pub struct GalleryReport {
    /// Files written, in render order (summary last).
    pub written: Vec<PathBuf>,
    /// Files that could not be written.
    pub failed: Vec<(PathBuf, CoreError)>,
}

impl GalleryReport {
    /// True when every file was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// `"4K Ultra"` → `"4k_ultra"`.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

/// `{stem}_{snake_case(name)}.txt`
#[must_use]
pub fn variant_file_name(stem: &str, name: &str) -> String {
    format!("{stem}_{}.txt", snake_case(name))
}

/// Table `name | WxH | ms | file`, one line per variant.
#[must_use]
pub fn summary_text(variants: &[Variant], stem: &str) -> String {
    let mut out = String::from("name | WxH | ms | file\n");
    for v in variants {
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            v.name,
            v.result.dimensions(),
            v.result.stats.elapsed.as_millis(),
            variant_file_name(stem, &v.name)
        );
    }
    out
}

/// Persist every variant then the summary under `dir`.
pub fn write_gallery<S: ArtifactSink + ?Sized>(
    sink: &S,
    variants: &[Variant],
    dir: &Path,
    stem: &str,
) -> GalleryReport {
    let mut report = GalleryReport::default();
    let artefacts = variants
        .iter()
        .map(|v| (dir.join(variant_file_name(stem, &v.name)), v.result.grid.to_text()))
        .chain(std::iter::once((
            dir.join(format!("{stem}_summary.txt")),
            summary_text(variants, stem),
        )));

    for (path, text) in artefacts {
        match sink.persist(text.as_bytes(), &path) {
            Ok(()) => {
                log::info!("Écrit : {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                log::warn!("Échec d'écriture {} : {e}", path.display());
                report.failed.push((path, e));
            }
        }
    }
    report
}
