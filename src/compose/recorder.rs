//! A composer that records instructions instead of drawing them.
//!
//! Geometry is stored the way a bottom-origin page description would use
//! it, so the recording doubles as a reference for real backends.

use serde::Serialize;

use super::json::{to_json, JsonFormat};
use super::raster::{em_factor, synthesize_glyph, RasterGlyph};
use super::{FontHandle, PageComposer, Rgb};
use crate::error::{Error, Result};
use crate::model::FontProperties;
use crate::units::{flip_y, to_points_from_dpi, IMAGE_DPI, LETTER_HEIGHT_PT, LETTER_WIDTH_PT};

/// One recorded composition instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ComposeCommand {
    /// A raster font was registered.
    AddFont {
        handle: FontHandle,
        nominal_size: i32,
        em_factor: f32,
        glyphs: Vec<RasterGlyph>,
    },
    /// Text placed with its baseline box at `(x, y)` from the bottom-left.
    Text {
        page: u32,
        text: String,
        font: FontHandle,
        x: f32,
        y: f32,
        width: f32,
        rgb: Rgb,
    },
    /// A stroked line, bottom-left origin.
    Line {
        page: u32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// A 1-bit image, lower-left corner at `(x, y)`.
    Image {
        page: u32,
        pixel_width: u32,
        pixel_height: u32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        #[serde(skip)]
        data: Vec<u8>,
    },
    /// The page ended.
    PageBreak { page: u32 },
    /// The document was closed.
    Close,
}

/// Records composition instructions in memory.
#[derive(Debug, Clone)]
pub struct RecordingComposer {
    page_width: f32,
    page_height: f32,
    page: u32,
    fonts: usize,
    commands: Vec<ComposeCommand>,
    closed: bool,
}

impl RecordingComposer {
    /// Create a recorder for US Letter pages.
    pub fn new() -> Self {
        Self::with_page_size(LETTER_WIDTH_PT, LETTER_HEIGHT_PT)
    }

    /// Create a recorder for pages of the given size in points.
    pub fn with_page_size(width: f32, height: f32) -> Self {
        Self {
            page_width: width,
            page_height: height,
            page: 1,
            fonts: 0,
            commands: Vec::new(),
            closed: false,
        }
    }

    /// Recorded instructions.
    pub fn commands(&self) -> &[ComposeCommand] {
        &self.commands
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> u32 {
        self.page
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Serialize the recorded instructions.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        to_json(&self.commands, format)
    }

    fn push(&mut self, command: ComposeCommand) -> Result<()> {
        if self.closed {
            return Err(Error::Compose("composer already closed".to_string()));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Default for RecordingComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageComposer for RecordingComposer {
    fn add_raster_font(&mut self, font: &FontProperties) -> Result<FontHandle> {
        let handle = FontHandle(self.fonts);
        let glyphs = font
            .mapped_glyphs()
            .filter_map(|g| synthesize_glyph(font, g))
            .collect();
        self.push(ComposeCommand::AddFont {
            handle,
            nominal_size: font.nominal_size,
            em_factor: em_factor(font),
            glyphs,
        })?;
        self.fonts += 1;
        Ok(handle)
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
        if font.0 >= self.fonts {
            return Err(Error::Compose(format!("font handle {} not registered", font.0)));
        }
        // Text boxes run to the right edge of the page.
        self.push(ComposeCommand::Text {
            page: self.page,
            text: text.to_string(),
            font,
            x,
            y: flip_y(y, self.page_height) - vertical_shift,
            width: self.page_width - x,
            rgb,
        })
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) -> Result<()> {
        self.push(ComposeCommand::Line {
            page: self.page,
            x1,
            y1: flip_y(y1, self.page_height),
            x2,
            y2: flip_y(y2, self.page_height),
            width,
        })
    }

    fn add_image(
        &mut self,
        bitmap: &[u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
    ) -> Result<()> {
        let display_width = to_points_from_dpi(width, IMAGE_DPI);
        let display_height = to_points_from_dpi(height, IMAGE_DPI);
        self.push(ComposeCommand::Image {
            page: self.page,
            pixel_width: width,
            pixel_height: height,
            x,
            y: flip_y(y, self.page_height) - display_height,
            width: display_width,
            height: display_height,
            data: bitmap.to_vec(),
        })
    }

    fn page_break(&mut self) -> Result<()> {
        self.push(ComposeCommand::PageBreak { page: self.page })?;
        self.page += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.push(ComposeCommand::Close)?;
        self.closed = true;
        Ok(())
    }
}
