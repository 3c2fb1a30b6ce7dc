use std::path::Path;

use am_core::error::CoreError;
use am_core::frame::PixelBuffer;
use am_core::traits::PixelSource;

/// Décodeur d'images statiques (PNG, JPEG, BMP, GIF) via le crate `image`.
///
/// # Example
/// ```no_run
/// use am_core::traits::PixelSource;
/// use am_source::image::ImageDecoder;
/// use std::path::Path;
/// let buffer = ImageDecoder.decode(Path::new("photo.jpg")).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl PixelSource for ImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, CoreError> {
        load_image(path)
    }
}

/// Load an image from disk as RGBA8.
///
/// # Errors
/// Returns [`CoreError::Decode`] if the file is missing, unreadable or corrupt.
///
/// # Example
/// ```no_run
/// use am_source::image::load_image;
/// let frame = load_image("test.png".as_ref()).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer, CoreError> {
    let img = image::open(path).map_err(|e| CoreError::Decode {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;
    let buffer = to_pixel_buffer(img, &path.display().to_string())?;
    log::info!(
        "Image chargée : {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(buffer)
}

/// Decode an in-memory encoded image (format guessed from the bytes).
///
/// # Errors
/// Returns [`CoreError::Decode`] if the bytes are not a supported image.
///
/// # Example
/// ```
/// use am_source::image::decode_bytes;
/// assert!(decode_bytes(b"not an image").is_err());
/// ```
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, CoreError> {
    let img = image::load_from_memory(bytes).map_err(|e| CoreError::Decode {
        path: "<mémoire>".into(),
        source: Box::new(e),
    })?;
    to_pixel_buffer(img, "<mémoire>")
}

fn to_pixel_buffer(img: image::DynamicImage, label: &str) -> Result<PixelBuffer, CoreError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw()).map_err(|e| CoreError::Decode {
        path: label.to_string(),
        source: Box::new(e),
    })
}

/// Encode a buffer as PNG at `path` (used to hand transformed images back).
///
/// # Errors
/// Returns [`CoreError::Io`] if encoding or writing fails.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<(), CoreError> {
    image::save_buffer_with_format(
        path,
        buffer.as_raw(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| CoreError::Io {
        path: path.display().to_string(),
        source: std::io::Error::other(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG garbage").unwrap();
        assert!(matches!(
            ImageDecoder.decode(&path),
            Err(CoreError::Decode { .. })
        ));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.png");
        let mut fb = PixelBuffer::filled(3, 2, [10, 20, 30, 255]);
        fb.set_pixel(2, 1, [200, 100, 0, 128]);
        save_png(&fb, &path).unwrap();

        let back = load_image(&path).unwrap();
        assert_eq!(back, fb);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode_bytes(&bytes).unwrap(), fb);
    }
}
