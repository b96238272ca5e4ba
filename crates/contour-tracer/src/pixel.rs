//! Packed contour pixel codes.
//!
//! Upstream edge-detection passes write one `i32` per raster cell. The code is
//! decoded into a [`ContourPixel`] once when a frame enters the tracer and
//! encoded back once when the frame is handed back, so the tracing code never
//! touches raw bit masks.
//!
//! Bit layout (least significant bit first):
//!
//! ```text
//!  bits  0-2   direction        (0..7)
//!  bit   3     direction error
//!  bit   4     on contour
//!  bit   5     processed
//!  bit   6     has parent
//!  bit   7     starting pixel
//!  bits  8-15  contour level    (valid 0..63)
//!  bits 16-23  angle            (0..255 -> 0..360 degrees)
//! ```

/// Number of elevation bands a contour pixel may belong to.
pub const MAX_DEPTH_LEVEL: usize = 64;

const DIRECTION_MASK: u32 = 0b111;
const DIRECTION_ERROR_BIT: u32 = 1 << 3;
const ON_CONTOUR_BIT: u32 = 1 << 4;
const PROCESSED_BIT: u32 = 1 << 5;
const HAS_PARENT_BIT: u32 = 1 << 6;
const STARTING_PIXEL_BIT: u32 = 1 << 7;
const LEVEL_SHIFT: u32 = 8;
const ANGLE_SHIFT: u32 = 16;

/// One of the eight compass steps a contour pixel can point along.
///
/// Offsets are expressed in raster index space where `W` is the raster width:
/// `{+1, +W+1, +W, +W-1, -1, -W-1, -W, -W+1}` for codes 0..7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    West = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
}

impl Direction {
    const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// (dx, dy) in raster coordinates, where +dy is the next row.
    const STEPS: [(isize, isize); 8] = [
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    /// Decode the low three bits of a direction field.
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0b111) as usize]
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Column and row delta of a single step.
    pub fn delta(self) -> (isize, isize) {
        Self::STEPS[self as usize]
    }

    /// Index reached by stepping once from `index`, or `None` when the step
    /// would wrap around the left/right raster edge or leave the buffer.
    pub fn step(self, index: usize, width: usize, len: usize) -> Option<usize> {
        if width == 0 || index >= len {
            return None;
        }

        let x = index % width;
        let (dx, dy) = self.delta();
        if dx < 0 && x == 0 {
            return None;
        }
        if dx > 0 && x + 1 == width {
            return None;
        }

        let offset = dy * width as isize + dx;
        let next = index as isize + offset;
        if next < 0 || next as usize >= len {
            return None;
        }

        Some(next as usize)
    }
}

/// Decoded form of a packed contour pixel code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContourPixel {
    pub direction: u8,
    pub direction_error: bool,
    pub on_contour: bool,
    pub processed: bool,
    pub has_parent: bool,
    pub starting_pixel: bool,
    pub contour_level: u8,
    pub angle: u8,
}

impl ContourPixel {
    /// Decode a packed code. Bits above the angle field are ignored.
    pub fn decode(code: i32) -> Self {
        let bits = code as u32;
        Self {
            direction: (bits & DIRECTION_MASK) as u8,
            direction_error: bits & DIRECTION_ERROR_BIT != 0,
            on_contour: bits & ON_CONTOUR_BIT != 0,
            processed: bits & PROCESSED_BIT != 0,
            has_parent: bits & HAS_PARENT_BIT != 0,
            starting_pixel: bits & STARTING_PIXEL_BIT != 0,
            contour_level: ((bits >> LEVEL_SHIFT) & 0xff) as u8,
            angle: ((bits >> ANGLE_SHIFT) & 0xff) as u8,
        }
    }

    pub fn encode(&self) -> i32 {
        let mut bits = (self.direction as u32) & DIRECTION_MASK;
        if self.direction_error {
            bits |= DIRECTION_ERROR_BIT;
        }
        if self.on_contour {
            bits |= ON_CONTOUR_BIT;
        }
        if self.processed {
            bits |= PROCESSED_BIT;
        }
        if self.has_parent {
            bits |= HAS_PARENT_BIT;
        }
        if self.starting_pixel {
            bits |= STARTING_PIXEL_BIT;
        }
        bits |= (self.contour_level as u32) << LEVEL_SHIFT;
        bits |= (self.angle as u32) << ANGLE_SHIFT;
        bits as i32
    }

    /// An unprocessed on-contour pixel pointing along `direction`.
    pub fn on_contour(level: u8, direction: Direction) -> Self {
        Self {
            direction: direction.code(),
            on_contour: true,
            contour_level: level,
            ..Self::default()
        }
    }

    pub fn with_angle(mut self, angle: u8) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_direction_error(mut self) -> Self {
        self.direction_error = true;
        self
    }

    pub fn direction(&self) -> Direction {
        Direction::from_bits(self.direction)
    }

    /// Quantised angle mapped onto `[0, 360)` degrees.
    pub fn angle_degrees(&self) -> f32 {
        self.angle as f32 * (360.0 / 256.0)
    }

    /// Whether the contour level addresses one of the tracked elevation bands.
    pub fn has_valid_level(&self) -> bool {
        (self.contour_level as usize) < MAX_DEPTH_LEVEL
    }

    /// Pixels the tracer never starts or extends a chain from.
    pub fn is_traceable(&self) -> bool {
        self.on_contour && !self.direction_error
    }
}
