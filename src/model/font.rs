//! Raster font and glyph types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Charset, CodePageTable};

/// Cell width for a glyph box: the box width rounded up to whole bytes.
///
/// Box widths in the font patterns map are zero-based, so a box width of 12
/// covers 13 pixels and needs a 16 pixel cell. `None` when the rounded width
/// does not fit in a `u32`.
pub fn cell_width_for(box_width: u32) -> Option<u32> {
    box_width.checked_add(1)?.checked_next_multiple_of(8)
}

/// Invert every bit of a raster pattern.
///
/// Pattern data marks background with set bits; the output convention is
/// set bit = ink.
pub fn invert_bits(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| !b).collect()
}

/// Placement metrics of a glyph, in 1/1000 em units unless noted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    /// Ascender height
    pub ascender: i32,
    /// Descender depth
    pub descender: i32,
    /// A-space (leading side bearing)
    pub a_space: i32,
    /// B-space (ink width)
    pub b_space: i32,
    /// C-space (trailing side bearing)
    pub c_space: i32,
    /// Baseline offset
    pub baseline_shift: i32,
    /// Character increment
    pub advance: i32,
}

/// A reconstructed raster glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphProperties {
    gcgid: String,
    code_point: Option<char>,
    code_point_native: Option<u16>,
    #[serde(skip_serializing, default)]
    bitmap: Vec<u8>,
    cell_width: u32,
    cell_height: u32,
    char_width: u32,
    metrics: GlyphMetrics,
}

impl GlyphProperties {
    /// Create a glyph from its ink bitmap and metrics.
    ///
    /// `bitmap` must hold `cell_width * cell_height / 8` bytes.
    pub fn new(
        gcgid: impl Into<String>,
        bitmap: Vec<u8>,
        cell_width: u32,
        cell_height: u32,
        char_width: u32,
        metrics: GlyphMetrics,
    ) -> Self {
        debug_assert_eq!(cell_width % 8, 0);
        debug_assert_eq!(bitmap.len(), (cell_width * cell_height / 8) as usize);
        Self {
            gcgid: gcgid.into(),
            code_point: None,
            code_point_native: None,
            bitmap,
            cell_width,
            cell_height,
            char_width,
            metrics,
        }
    }

    /// Graphic character global id.
    pub fn gcgid(&self) -> &str {
        &self.gcgid
    }

    /// Resolved output character.
    pub fn code_point(&self) -> Option<char> {
        self.code_point
    }

    /// Resolved code point in the code page's native encoding.
    pub fn code_point_native(&self) -> Option<u16> {
        self.code_point_native
    }

    /// Whether a code point has been resolved.
    pub fn is_mapped(&self) -> bool {
        self.code_point.is_some()
    }

    pub(crate) fn set_code_point(&mut self, native: u16, ch: Option<char>) {
        self.code_point_native = Some(native);
        self.code_point = ch;
    }

    /// Ink bitmap, row-major, each row padded to whole bytes.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Bytes per bitmap row.
    pub fn row_bytes(&self) -> usize {
        (self.cell_width / 8) as usize
    }

    /// Bitmap row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let stride = self.row_bytes();
        let start = y as usize * stride;
        self.bitmap.get(start..start + stride)
    }

    /// Whether pixel `(x, y)` is ink.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.cell_width {
            return false;
        }
        self.row(y)
            .map(|row| row[(x / 8) as usize] & (0x80 >> (x % 8)) != 0)
            .unwrap_or(false)
    }

    /// Cell width in pixels (multiple of 8).
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Cell height in pixels.
    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Width of the character box without row padding.
    pub fn char_width(&self) -> u32 {
        self.char_width
    }

    /// Placement metrics.
    pub fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Ascender plus descender.
    pub fn character_height(&self) -> i32 {
        self.metrics.ascender + self.metrics.descender
    }
}

/// Counts from resolving a font against a code page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Glyphs that received a code point
    pub resolved: usize,
    /// Glyphs absent from the code page
    pub unmapped: usize,
}

/// A reconstructed raster font.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontProperties {
    /// Nominal size in points
    pub nominal_size: i32,

    /// Maximum character box width
    pub max_character_width: u32,

    /// Maximum character box height
    pub max_character_height: u32,

    /// Maximum ascender height
    pub max_ascender: i32,

    /// Maximum descender depth
    pub max_descender: i32,

    /// Code page the glyphs were resolved against
    pub code_page_name: Option<String>,

    glyphs: BTreeMap<String, GlyphProperties>,
}

impl FontProperties {
    /// Create a font with zero metrics and no glyphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a glyph.
    pub fn add_glyph(&mut self, glyph: GlyphProperties) {
        self.glyphs.insert(glyph.gcgid.clone(), glyph);
    }

    /// Glyph by global id.
    pub fn glyph(&self, gcgid: &str) -> Option<&GlyphProperties> {
        self.glyphs.get(gcgid)
    }

    /// All glyphs, ordered by global id.
    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphProperties> {
        self.glyphs.values()
    }

    /// Glyphs with a resolved code point.
    pub fn mapped_glyphs(&self) -> impl Iterator<Item = &GlyphProperties> {
        self.glyphs.values().filter(|g| g.is_mapped())
    }

    /// Number of glyphs.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Assign code points to every glyph found in code page `name`.
    ///
    /// Unknown code pages fall back to the table default. Glyphs missing
    /// from the code page keep no code point.
    pub fn resolve_code_points(
        &mut self,
        code_pages: &CodePageTable,
        name: &str,
        charset: Charset,
    ) -> ResolveStats {
        let mut stats = ResolveStats::default();
        let page = code_pages.resolve(name);
        if page.is_none() {
            log::warn!(
                "code page {} and default {} not available, glyphs stay unmapped",
                name,
                code_pages.default_name()
            );
        }
        self.code_page_name = page.map(|p| p.name.clone());

        for glyph in self.glyphs.values_mut() {
            match page.and_then(|p| p.code_point(&glyph.gcgid)) {
                Some(native) => {
                    let ch = charset.decode_code_point(native);
                    glyph.set_code_point(native, ch);
                    stats.resolved += 1;
                }
                None => {
                    log::trace!("{} not found in code page {}", glyph.gcgid, name);
                    stats.unmapped += 1;
                }
            }
        }
        stats
    }
}
