//! Image object assembly.

use crate::model::invert_bits;
use crate::record::ColorValue;

/// An image object under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageBuilder {
    pub name: String,
    /// Object area origin in 1/1440 inch
    pub x_origin: i32,
    pub y_origin: i32,
    /// Size in pixels
    pub width: u32,
    pub height: u32,
    pub bilevel_color: Option<ColorValue>,
    data: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the object area origin.
    pub fn set_origin(&mut self, x_origin: i32, y_origin: i32) {
        self.x_origin = x_origin;
        self.y_origin = y_origin;
    }

    /// Set the pixel size and bilevel color.
    pub fn describe(&mut self, width: u32, height: u32, bilevel_color: Option<ColorValue>) {
        self.width = width;
        self.height = height;
        if bilevel_color.is_some() {
            self.bilevel_color = bilevel_color;
        }
    }

    /// Append a chunk of picture data.
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Raw picture data (set bit = background).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Picture data with ink as set bits.
    pub fn bitmap(&self) -> Vec<u8> {
        invert_bits(&self.data)
    }

    /// Bytes needed for a full 1-bit raster of the described size.
    pub fn expected_len(&self) -> usize {
        (self.width as usize).div_ceil(8) * self.height as usize
    }
}
