use serde::{Deserialize, Serialize};

/// A position on the map canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift the point horizontally
    pub fn offset_x(self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}
