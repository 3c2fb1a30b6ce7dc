use am_core::frame::PixelBuffer;

use crate::luminance::{LuminanceField, perceptual_luminance};

/// 3×3 Sobel over the neighbourhood given by `sample`.
///
/// Kernels `[-1 0 1; -2 0 2; -1 0 1]` and its transpose. Each symmetric pair is
/// subtracted before weighting, so a flat neighbourhood gives exactly zero.
#[inline(always)]
fn sobel(x: i64, y: i64, sample: impl Fn(i64, i64) -> f64) -> (f64, f64) {
    let s = |dx: i64, dy: i64| sample(x + dx, y + dy);
    let gx = (s(1, -1) - s(-1, -1)) + 2.0 * (s(1, 0) - s(-1, 0)) + (s(1, 1) - s(-1, 1));
    let gy = (s(-1, 1) - s(-1, -1)) + 2.0 * (s(0, 1) - s(0, -1)) + (s(1, 1) - s(1, -1));
    (gx, gy)
}

/// Gradient components (gx, gy) at pixel (x, y); borders replicate.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_ascii::{edge::gradient, LuminanceField};
/// let field = LuminanceField::from_buffer(&PixelBuffer::new(4, 4));
/// assert_eq!(gradient(&field, 0, 0), (0.0, 0.0));
/// ```
#[must_use]
pub fn gradient(field: &LuminanceField, x: u32, y: u32) -> (f64, f64) {
    sobel(i64::from(x), i64::from(y), |sx, sy| field.at_clamped(sx, sy))
}

/// Sobel magnitude `sqrt(gx² + gy²)` on the perceptual brightness field.
///
/// Unnormalised: a hard black/white vertical edge yields 1020.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_ascii::{edge::edge_strength, LuminanceField};
/// let field = LuminanceField::from_buffer(&PixelBuffer::filled(5, 5, [90, 90, 90, 255]));
/// assert_eq!(edge_strength(&field, 2, 2), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn edge_strength(field: &LuminanceField, x: u32, y: u32) -> f64 {
    let (gx, gy) = gradient(field, x, y);
    (gx * gx + gy * gy).sqrt()
}

/// Same as [`edge_strength`], reading the buffer directly (no cached field).
#[must_use]
pub fn edge_strength_at(buffer: &PixelBuffer, x: u32, y: u32) -> f64 {
    let (gx, gy) = sobel(i64::from(x), i64::from(y), |sx, sy| {
        let (cx, cy) = buffer.clamp(sx, sy);
        let (r, g, b, _) = buffer.pixel(cx, cy);
        perceptual_luminance(r, g, b)
    });
    (gx * gx + gy * gy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_vertical(width: u32, height: u32, at: u32) -> PixelBuffer {
        let mut fb = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in at..width {
                fb.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        fb
    }

    #[test]
    fn uniform_image_has_no_edges_anywhere() {
        let fb = PixelBuffer::filled(6, 4, [31, 140, 222, 255]);
        let field = LuminanceField::from_buffer(&fb);
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(edge_strength(&field, x, y), 0.0, "({x},{y})");
                assert_eq!(edge_strength_at(&fb, x, y), 0.0);
            }
        }
    }

    #[test]
    fn every_flat_grey_cancels_exactly() {
        for v in 0..=255u8 {
            let fb = PixelBuffer::filled(5, 5, [v, v, v, 255]);
            let field = LuminanceField::from_buffer(&fb);
            // coins, bords, centre
            for (x, y) in [(0, 0), (4, 4), (0, 2), (2, 0), (4, 1), (2, 2), (1, 3)] {
                assert_eq!(gradient(&field, x, y), (0.0, 0.0), "gris {v} en ({x},{y})");
                assert_eq!(edge_strength(&field, x, y), 0.0, "gris {v} en ({x},{y})");
                assert_eq!(edge_strength_at(&fb, x, y), 0.0, "gris {v} en ({x},{y})");
            }
        }
    }

    #[test]
    fn vertical_edge_has_pure_horizontal_gradient() {
        let fb = split_vertical(6, 6, 3);
        let field = LuminanceField::from_buffer(&fb);
        let (gx, gy) = gradient(&field, 2, 3);
        assert!((gx - 1020.0).abs() < 1e-6);
        assert!(gy.abs() < 1e-9);
        assert!((edge_strength(&field, 3, 3) - 1020.0).abs() < 1e-6);
        // loin du bord : rien
        assert_eq!(edge_strength(&field, 0, 3), 0.0);
    }

    #[test]
    fn border_pixels_replicate_instead_of_wrapping() {
        // colonne blanche à droite : sans réplication, x=0 verrait x=5 par wrap
        let fb = split_vertical(6, 3, 5);
        let field = LuminanceField::from_buffer(&fb);
        assert_eq!(edge_strength(&field, 0, 1), 0.0);
        assert!(edge_strength(&field, 5, 1) > 0.0);
    }

    #[test]
    fn cached_and_direct_paths_agree() {
        let mut fb = PixelBuffer::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                fb.set_pixel(x, y, [(x * 50) as u8, (y * 60) as u8, 30, 255]);
            }
        }
        let field = LuminanceField::from_buffer(&fb);
        for (x, y) in [(0, 0), (2, 2), (4, 1), (3, 4)] {
            assert_eq!(
                edge_strength(&field, x, y).to_bits(),
                edge_strength_at(&fb, x, y).to_bits()
            );
        }
    }
}
