//! Generators for synthetic contour rasters.
//!
//! These build the packed `i32` rasters upstream edge detection would hand to
//! the tracer, with predictable chain shapes so tests can check exact node
//! and label counts.

use contour_tracer::{ContourPixel, Direction};

/// Creates an empty raster (no contour pixels).
pub fn create_empty_raster(width: usize, height: usize) -> Vec<i32> {
    vec![0; width * height]
}

/// Writes a horizontal contour running east along `row` from `x0` to `x1`
/// inclusive.
///
/// Every pixel points east; the last one points off the line (or off the
/// raster edge), so the chain ends there.
pub fn draw_horizontal_line(
    raster: &mut [i32],
    width: usize,
    row: usize,
    x0: usize,
    x1: usize,
    level: u8,
) {
    for x in x0..=x1 {
        raster[row * width + x] = ContourPixel::on_contour(level, Direction::East).encode();
    }
}

/// Writes a closed rectangular contour with corners `(left, top)` and
/// `(right, bottom)`, where `top < bottom` in raster rows.
///
/// The loop runs east along `top`, along increasing rows down `right`, west
/// along `bottom` and back along decreasing rows up `left`, so tracing from the
/// first pixel in raster order returns to it. The loop has
/// `2 * (right - left) + 2 * (bottom - top)` pixels.
pub fn draw_rectangle_loop(
    raster: &mut [i32],
    width: usize,
    (left, top): (usize, usize),
    (right, bottom): (usize, usize),
    level: u8,
) {
    assert!(left < right && top < bottom, "rectangle must span at least 2x2 pixels");

    let mut set = |x: usize, y: usize, dir: Direction| {
        raster[y * width + x] = ContourPixel::on_contour(level, dir).encode();
    };

    for x in left..right {
        set(x, top, Direction::East);
    }
    for y in top..bottom {
        set(right, y, Direction::North);
    }
    for x in (left + 1)..=right {
        set(x, bottom, Direction::West);
    }
    for y in (top + 1)..=bottom {
        set(left, y, Direction::South);
    }
}

/// Number of pixels on the loop drawn by [`draw_rectangle_loop`].
pub fn rectangle_loop_len((left, top): (usize, usize), (right, bottom): (usize, usize)) -> usize {
    2 * (right - left) + 2 * (bottom - top)
}

/// Creates a raster of nested rectangular loops, one level per ring.
///
/// Ring `i` is inset by `i * gap` pixels from the border and carries level
/// `i % 64`. Useful for benchmarks that need many long closed chains.
pub fn create_concentric_loops(width: usize, height: usize, gap: usize) -> Vec<i32> {
    let mut raster = create_empty_raster(width, height);
    let gap = gap.max(2);
    let mut ring = 0usize;
    loop {
        let inset = ring * gap;
        if width < 2 * inset + 3 || height < 2 * inset + 3 {
            break;
        }
        let left = inset;
        let top = inset;
        let right = width - 1 - inset;
        let bottom = height - 1 - inset;
        draw_rectangle_loop(&mut raster, width, (left, top), (right, bottom), (ring % 64) as u8);
        ring += 1;
    }
    raster
}

/// Creates a raster of horizontal lines every `row_step` rows, spanning the
/// full width, with levels cycling through the elevation bands.
pub fn create_striped_raster(width: usize, height: usize, row_step: usize) -> Vec<i32> {
    let mut raster = create_empty_raster(width, height);
    if width == 0 {
        return raster;
    }
    for (i, row) in (0..height).step_by(row_step.max(1)).enumerate() {
        draw_horizontal_line(&mut raster, width, row, 0, width - 1, (i % 64) as u8);
    }
    raster
}

/// Creates a raster with deterministic pseudo-random contour pixels.
///
/// Roughly one pixel in `sparsity` is on a contour, with a hashed direction,
/// level below `levels` and angle. Occasional pixels carry a direction error
/// or an out-of-range level to exercise the lossy paths.
pub fn create_noisy_raster(
    width: usize,
    height: usize,
    sparsity: u32,
    levels: u8,
    seed: u32,
) -> Vec<i32> {
    let sparsity = sparsity.max(1);
    let levels = levels.max(1);
    let mut raster = create_empty_raster(width, height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            if hash % sparsity != 0 {
                continue;
            }
            let mut px = ContourPixel::on_contour(
                ((hash >> 8) % levels as u32) as u8,
                Direction::from_bits((hash >> 4) as u8),
            )
            .with_angle((hash >> 16) as u8);
            if hash % 97 == 0 {
                px = px.with_direction_error();
            }
            if hash % 89 == 0 {
                px.contour_level = 200;
            }
            raster[row * width + col] = px.encode();
        }
    }
    raster
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
