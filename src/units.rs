//! Unit conversion between the input's linear units and output points.
//!
//! Input positions are measured in 1/1440 inch from the top-left corner of
//! the page. Composition backends expect points (1/72 inch), and most of them
//! measure from the bottom-left corner.

/// Input linear units per inch.
pub const UNITS_PER_INCH: f32 = 1440.0;

/// Output points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Input units per output point (1440 / 72).
pub const UNITS_PER_POINT: f32 = UNITS_PER_INCH / POINTS_PER_INCH;

/// Resolution of raster image data in dots per inch.
pub const IMAGE_DPI: f32 = 300.0;

/// US Letter page width in points (8.5 inch).
pub const LETTER_WIDTH_PT: f32 = 612.0;

/// US Letter page height in points (11 inch).
pub const LETTER_HEIGHT_PT: f32 = 792.0;

/// Convert a 1/1440 inch value to points.
pub fn to_points(value: i32) -> f32 {
    value as f32 / UNITS_PER_POINT
}

/// Convert points back to 1/1440 inch.
pub fn from_points(points: f32) -> i32 {
    (points * UNITS_PER_POINT).round() as i32
}

/// Convert a pixel count at `dpi` to points.
pub fn to_points_from_dpi(pixels: u32, dpi: f32) -> f32 {
    pixels as f32 * POINTS_PER_INCH / dpi
}

/// Convert a top-origin coordinate to bottom-origin.
pub fn flip_y(top: f32, page_height: f32) -> f32 {
    page_height - top
}
