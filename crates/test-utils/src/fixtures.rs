//! Hand-drawn contour raster fixtures.
//!
//! Rasters are written as ASCII, one line per raster row, first line is row 0:
//!
//! - `0`..`7`: on-contour pixel with that direction code
//! - `x`: on-contour pixel with a direction error
//! - `.`: background
//!
//! Direction codes step through the raster as `{+1, +W+1, +W, +W-1, -1, -W-1,
//! -W, -W+1}`, so in the drawing `0` points right, `2` points to the next line
//! down, `4` points left and `6` points to the line above.

use contour_tracer::{ContourPixel, Direction};

/// Parsed ASCII raster.
#[derive(Debug, Clone)]
pub struct AsciiRaster {
    pub width: usize,
    pub height: usize,
    pub codes: Vec<i32>,
}

impl AsciiRaster {
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn pixel(&self, x: usize, y: usize) -> ContourPixel {
        ContourPixel::decode(self.codes[self.index(x, y)])
    }
}

/// Parse an ASCII raster where every contour pixel is on `level`.
pub fn raster_from_ascii(grid: &str, level: u8) -> AsciiRaster {
    let rows: Vec<&str> = grid
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let height = rows.len();
    assert!(height > 0, "grid must have at least one non-empty row");
    let width = rows[0].len();
    assert!(width > 0, "grid rows must be non-empty");
    for r in &rows {
        assert_eq!(r.len(), width, "all rows must have equal length");
    }

    let mut codes = vec![0i32; width * height];
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let px = match ch {
                '.' => continue,
                'x' => ContourPixel::on_contour(level, Direction::East).with_direction_error(),
                '0'..='7' => {
                    let code = ch.to_digit(10).unwrap_or(0) as u8;
                    ContourPixel::on_contour(level, Direction::from_bits(code))
                }
                _ => panic!("invalid raster char '{ch}', expected '.', 'x' or 0-7"),
            };
            codes[y * width + x] = px.encode();
        }
    }

    AsciiRaster {
        width,
        height,
        codes,
    }
}

/// Overlay the contour pixels of `top` onto `base`. Both must share dimensions.
pub fn overlay(base: &mut AsciiRaster, top: &AsciiRaster) {
    assert_eq!(base.width, top.width, "width mismatch");
    assert_eq!(base.height, top.height, "height mismatch");
    for (dst, &src) in base.codes.iter_mut().zip(&top.codes) {
        if src != 0 {
            *dst = src;
        }
    }
}

/// Straight four-pixel line on row 2 of a 4x4 raster.
pub const STRAIGHT_ROW: &str = "
    ....
    ....
    0000
    ....
";

/// Closed 3x3 square loop (8 pixels) inside a 5x5 raster.
pub const SQUARE_LOOP: &str = "
    .....
    .002.
    .6.2.
    .644.
    .....
";

/// A down-left step clips the start of a merged chain and must be retried
/// straight down.
///
/// Row 0 traces `(2,0) -> (1,0)`, absorbing the root at `(1,0)`. The pixel at
/// `(2,1)` points down-left onto `(1,0)`, which already has a parent, so the
/// walk retries at `(2,0)` and absorbs that chain instead: one chain of three.
pub const DOWN_LEFT_RETRY: &str = "
    .44.
    ..5.
";

/// Like [`DOWN_LEFT_RETRY`] but the blocked step is diagonal up-right, which
/// gets no retry: the single-pixel chain at `(0,1)` is pruned.
pub const BLOCKED_SINGLE_PIXEL: &str = "
    .44.
    7...
";

/// Two chains that meet: the second one runs into the start of the first.
pub const MERGING_CHAINS: &str = "
    ...000.
    0006...
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_straight_row() {
        let r = raster_from_ascii(STRAIGHT_ROW, 5);
        assert_eq!((r.width, r.height), (4, 4));
        assert!(r.pixel(0, 2).on_contour);
        assert_eq!(r.pixel(3, 2).contour_level, 5);
        assert!(!r.pixel(0, 0).on_contour);
    }

    #[test]
    fn test_parse_direction_error() {
        let r = raster_from_ascii("x.", 1);
        assert!(r.pixel(0, 0).direction_error);
    }

    #[test]
    fn test_overlay_keeps_both_levels() {
        let mut base = raster_from_ascii("00..", 1);
        let top = raster_from_ascii("..00", 2);
        overlay(&mut base, &top);
        assert_eq!(base.pixel(0, 0).contour_level, 1);
        assert_eq!(base.pixel(3, 0).contour_level, 2);
    }

    #[test]
    #[should_panic(expected = "invalid raster char")]
    fn test_parse_rejects_unknown_char() {
        raster_from_ascii("0?", 1);
    }
}
