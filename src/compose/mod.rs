//! Page composition: the contract between the interpreter and an output
//! backend, plus a recording backend.
//!
//! All coordinates handed to a [`PageComposer`] are in points measured from
//! the top-left corner of the page. Backends that draw from the bottom-left
//! corner flip them with [`crate::units::flip_y`].

mod font_dump;
mod json;
mod raster;
mod recorder;

pub use font_dump::{dump_font, dump_glyph_bitmap};
pub use json::{to_json, JsonFormat};
pub use raster::{em_factor, synthesize_glyph, RasterGlyph, INTERNAL_RESOLUTION};
pub use recorder::{ComposeCommand, RecordingComposer};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::FontProperties;

/// RGB color triple.
pub type Rgb = [u8; 3];

/// Handle of a font registered with a composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle(pub usize);

/// Output backend receiving composition instructions.
pub trait PageComposer {
    /// Register a raster font; only glyphs with a resolved code point are
    /// usable in text.
    fn add_raster_font(&mut self, font: &FontProperties) -> Result<FontHandle>;

    /// Place `text` with its top-left corner at `(x, y)`.
    ///
    /// `vertical_shift` moves the baseline down so that text measured from
    /// its top sits on the right line.
    fn add_text(
        &mut self,
        text: &str,
        font: FontHandle,
        vertical_shift: f32,
        x: f32,
        y: f32,
        rgb: Rgb,
    ) -> Result<()>;

    /// Stroke a line.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) -> Result<()>;

    /// Place a 1-bit image (set bit = ink) of `width` x `height` pixels.
    fn add_image(&mut self, bitmap: &[u8], width: u32, height: u32, x: f32, y: f32)
        -> Result<()>;

    /// Start a new page.
    fn page_break(&mut self) -> Result<()>;

    /// Finish the output.
    fn close(&mut self) -> Result<()>;
}

impl<C: PageComposer + ?Sized> PageComposer for &mut C {
    fn add_raster_font(&mut self, font: &FontProperties) -> Result<FontHandle> {
        (**self).add_raster_font(font)
    }

    fn add_text(
        &mut self,
        text: &str,
        font: FontHandle,
        vertical_shift: f32,
        x: f32,
        y: f32,
        rgb: Rgb,
    ) -> Result<()> {
        (**self).add_text(text, font, vertical_shift, x, y, rgb)
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) -> Result<()> {
        (**self).draw_line(x1, y1, x2, y2, width)
    }

    fn add_image(
        &mut self,
        bitmap: &[u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
    ) -> Result<()> {
        (**self).add_image(bitmap, width, height, x, y)
    }

    fn page_break(&mut self) -> Result<()> {
        (**self).page_break()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
