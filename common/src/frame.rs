//! The brightness grid shared by the session and game state machines, and
//! its mapping from logical panels to grid regions.

use crate::messages::Error;

pub const FULL_BRIGHTNESS: u8 = 255;

/// Half-open rectangle [x_start, x_stop) x [y_start, y_stop) of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x_start: usize,
    pub x_stop: usize,
    pub y_start: usize,
    pub y_stop: usize,
}

impl Region {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_start && x < self.x_stop && y >= self.y_start && y < self.y_stop
    }

    pub fn is_empty(&self) -> bool {
        self.x_start >= self.x_stop || self.y_start >= self.y_stop
    }

    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.x_stop - self.x_start) * (self.y_stop - self.y_start)
    }
}

/// One quadrant of the display, or one of the two special selectors. The
/// wire never carries these; they only select which region of the
/// [`FrameBuffer`] to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Turns every panel off.
    AllOff,
    /// Turns every panel on. Any index outside 1-4 and -1 maps here.
    AllOn,
}

impl Panel {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Self::TopLeft,
            2 => Self::TopRight,
            3 => Self::BottomLeft,
            4 => Self::BottomRight,
            -1 => Self::AllOff,
            _ => Self::AllOn,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::TopLeft => 1,
            Self::TopRight => 2,
            Self::BottomLeft => 3,
            Self::BottomRight => 4,
            Self::AllOff => -1,
            Self::AllOn => 0,
        }
    }

    /// The four playable quadrants in index order.
    pub fn quadrants() -> [Panel; 4] {
        [
            Self::TopLeft,
            Self::TopRight,
            Self::BottomLeft,
            Self::BottomRight,
        ]
    }

    pub fn region(self, width: usize, height: usize) -> Region {
        let (x_start, x_stop, y_start, y_stop) = match self {
            Self::TopLeft => (0, width / 2, 0, height / 2),
            Self::TopRight => (0, width / 2, height / 2, height),
            Self::BottomLeft => (width / 2, width, 0, height / 2),
            Self::BottomRight => (width / 2, width, height / 2, height),
            Self::AllOff => (width, width, height, height),
            Self::AllOn => (0, width, 0, height),
        };
        Region {
            x_start,
            x_stop,
            y_start,
            y_stop,
        }
    }
}

/// Row-major grid of brightness cells. Dimensions are fixed at construction;
/// the session negotiates them once during the handshake and they are never
/// re-negotiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[x * self.height + y]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.cells[x * self.height + y] = value;
    }

    /// Overwrites the whole grid: cells inside `region` get `value`, every
    /// other cell gets 0. The loops are bounded by the grid dimensions, so
    /// out-of-range region coordinates clamp implicitly.
    pub fn fill_region(&mut self, region: Region, value: u8) {
        for x in 0 .. self.width {
            for y in 0 .. self.height {
                let cell = if region.contains(x, y) { value } else { 0 };
                self.cells[x * self.height + y] = cell;
            }
        }
    }

    /// Lights the given panel at full brightness and darkens the rest.
    pub fn paint(&mut self, panel: Panel) {
        self.fill_region(panel.region(self.width, self.height), FULL_BRIGHTNESS);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

/// Serializes the buffer into the wire frame: exactly width x height bytes,
/// row-major, one brightness byte per cell.
pub fn encode_frame(frame: &FrameBuffer, width: usize, height: usize) -> Result<Vec<u8>, Error> {
    if frame.width != width || frame.height != height {
        return Err(Error::DimensionMismatch {
            expected_width: width,
            expected_height: height,
            actual_width: frame.width,
            actual_height: frame.height,
        });
    }
    Ok(frame.cells.clone())
}
