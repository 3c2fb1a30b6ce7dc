use std::fmt::Write as _;

use am_core::config::FrameStyle;
use am_core::frame::CharGrid;

/// Box-drawing set: corners (tl, tr, bl, br), horizontal, vertical, gutters.
struct Border {
    corners: [char; 4],
    horizontal: char,
    vertical: char,
    left_pad: usize,
    right_pad: usize,
}

const SIMPLE: Border = Border {
    corners: ['+', '+', '+', '+'],
    horizontal: '-',
    vertical: '|',
    left_pad: 0,
    right_pad: 2,
};

const DOUBLE: Border = Border {
    corners: ['╔', '╗', '╚', '╝'],
    horizontal: '═',
    vertical: '║',
    left_pad: 2,
    right_pad: 2,
};

const ARTISTIC: Border = Border {
    corners: ['┌', '┐', '└', '┘'],
    horizontal: '─',
    vertical: '│',
    left_pad: 2,
    right_pad: 2,
};

/// Grid text wrapped in the requested border; every line ends with `\n`.
///
/// # Example
/// ```
/// use am_core::config::FrameStyle;
/// use am_core::frame::CharGrid;
/// use am_ascii::frame_text;
/// let grid = CharGrid::parse("ab\ncd\n").unwrap();
/// assert_eq!(frame_text(&grid, FrameStyle::Simple), "+----+\n|ab  |\n|cd  |\n+----+\n");
/// assert_eq!(frame_text(&grid, FrameStyle::None), "ab\ncd\n");
/// ```
#[must_use]
pub fn frame_text(grid: &CharGrid, style: FrameStyle) -> String {
    let border = match style {
        FrameStyle::None => return grid.to_text(),
        FrameStyle::Simple => &SIMPLE,
        FrameStyle::Double => &DOUBLE,
        FrameStyle::Artistic => &ARTISTIC,
    };

    let inner = grid.width() as usize + border.left_pad + border.right_pad;
    let rule: String = std::iter::repeat_n(border.horizontal, inner).collect();
    let [tl, tr, bl, br] = border.corners;
    let v = border.vertical;

    let mut out = String::with_capacity((inner + 3) * (grid.height() as usize + 2) * 3);
    let _ = writeln!(out, "{tl}{rule}{tr}");
    for row in grid.rows() {
        out.push(v);
        out.extend(std::iter::repeat_n(' ', border.left_pad));
        out.extend(row.iter());
        out.extend(std::iter::repeat_n(' ', border.right_pad));
        out.push(v);
        out.push('\n');
    }
    let _ = writeln!(out, "{bl}{rule}{br}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_frame_has_two_space_gutters() {
        let grid = CharGrid::parse("#.\n.#\n").unwrap();
        let text = frame_text(&grid, FrameStyle::Double);
        assert_eq!(text, "╔══════╗\n║  #.  ║\n║  .#  ║\n╚══════╝\n");
    }

    #[test]
    fn artistic_frame_lines_share_one_width() {
        let grid = CharGrid::parse("abc\ndef\nghi\n").unwrap();
        let text = frame_text(&grid, FrameStyle::Artistic);
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths, [9; 5]);
        assert!(text.starts_with('┌') && text.trim_end().ends_with('┘'));
    }

    #[test]
    fn empty_grid_still_gets_a_box() {
        let text = frame_text(&CharGrid::new(0, 0), FrameStyle::Simple);
        assert_eq!(text, "+--+\n+--+\n");
    }
}
