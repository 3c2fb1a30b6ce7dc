use std::path::Path;

use crate::error::CoreError;
use crate::frame::PixelBuffer;

/// Décode une image en buffer RGBA.
///
/// Implémenté par : `ImageDecoder` (crate am-source).
///
/// # Example
/// ```
/// use am_core::traits::PixelSource;
/// use am_core::frame::PixelBuffer;
/// use am_core::error::CoreError;
/// use std::path::Path;
///
/// struct Solid;
/// impl PixelSource for Solid {
///     fn decode(&self, _path: &Path) -> Result<PixelBuffer, CoreError> {
///         Ok(PixelBuffer::filled(2, 2, [255, 255, 255, 255]))
///     }
/// }
/// assert_eq!(Solid.decode(Path::new("x")).unwrap().width(), 2);
/// ```
pub trait PixelSource {
    /// Decode the image at `path`.
    ///
    /// # Errors
    /// [`CoreError::Decode`] carrying the decoder's cause.
    fn decode(&self, path: &Path) -> Result<PixelBuffer, CoreError>;
}

/// Persiste les octets d'un artefact rendu.
///
/// # Example
/// ```
/// use am_core::traits::ArtifactSink;
/// use am_core::error::CoreError;
/// use std::path::Path;
///
/// struct Discard;
/// impl ArtifactSink for Discard {
///     fn persist(&self, _bytes: &[u8], _dest: &Path) -> Result<(), CoreError> { Ok(()) }
/// }
/// ```
pub trait ArtifactSink {
    /// Write `bytes` to `dest`.
    ///
    /// # Errors
    /// [`CoreError::Io`] if the write fails.
    fn persist(&self, bytes: &[u8], dest: &Path) -> Result<(), CoreError>;
}
