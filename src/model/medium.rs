//! Medium maps: named physical page definitions.

use serde::{Deserialize, Serialize};

/// A medium map with its page coordinate origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    /// Medium map name
    pub name: String,

    /// Page origin x offset (1/1440 inch)
    pub x_origin: i32,

    /// Page origin y offset (1/1440 inch)
    pub y_origin: i32,

    /// Physical width in inches
    pub width: f32,

    /// Physical height in inches
    pub height: f32,
}

impl Medium {
    /// Create a US Letter medium with a zero origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x_origin: 0,
            y_origin: 0,
            width: 8.5,
            height: 11.0,
        }
    }

    /// Set the page origin.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.x_origin = x;
        self.y_origin = y;
        self
    }

    /// Origin offsets as `(x, y)`.
    pub fn origin(&self) -> (i32, i32) {
        (self.x_origin, self.y_origin)
    }
}
