//! Raster glyph synthesis for Type 3 style output fonts.
//!
//! Each glyph is drawn as an image mask inside a glyph space whose em box is
//! `(nominal_size / 72) * INTERNAL_RESOLUTION` units tall, so that metrics
//! in 1/1000 em map to whole internal units.

use serde::Serialize;

use crate::model::{FontProperties, GlyphProperties};

/// Internal glyph space units per inch.
pub const INTERNAL_RESOLUTION: f32 = 6000.0;

/// Placement of one glyph mask in glyph space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterGlyph {
    /// Character the glyph is encoded under
    pub ch: char,
    /// Advance width in glyph space
    pub advance: i32,
    /// Glyph box height in glyph space
    pub box_height: i32,
    /// Mask width in pixels
    pub mask_width: u32,
    /// Mask height in pixels
    pub mask_height: u32,
    /// Horizontal scale of the mask
    pub scale_x: f32,
    /// Vertical scale of the mask
    pub scale_y: f32,
    /// Horizontal offset of the mask
    pub shift_x: i32,
    /// Vertical offset of the mask
    pub shift_y: f32,
}

/// Glyph space units per em for `font`.
pub fn em_factor(font: &FontProperties) -> f32 {
    font.nominal_size as f32 * INTERNAL_RESOLUTION / 72.0
}

/// Compute the mask placement of `glyph`. Unmapped glyphs yield `None`.
pub fn synthesize_glyph(font: &FontProperties, glyph: &GlyphProperties) -> Option<RasterGlyph> {
    let ch = glyph.code_point()?;
    let factor = em_factor(font);
    let unit = factor / 1000.0;
    let metrics = glyph.metrics();
    let char_height = glyph.character_height();

    // Negative descenders are treated as sitting on the baseline.
    let descender = metrics.descender.max(0);
    let mut shift_y = (font.max_descender - descender) as f32 * unit;
    if metrics.baseline_shift > char_height {
        shift_y += (metrics.baseline_shift - char_height) as f32;
    }

    Some(RasterGlyph {
        ch,
        advance: (metrics.advance as f32 * unit) as i32,
        box_height: factor as i32,
        mask_width: glyph.char_width(),
        mask_height: glyph.cell_height(),
        scale_x: metrics.b_space as f32 * unit,
        scale_y: char_height as f32 * unit,
        shift_x: (metrics.a_space as f32 * unit) as i32,
        shift_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Charset, CodePage, CodePageTable, GlyphMetrics};

    fn font_with(metrics: GlyphMetrics) -> FontProperties {
        let mut font = FontProperties::new();
        font.nominal_size = 12;
        font.max_descender = 200;
        font.add_glyph(GlyphProperties::new(
            "LA010000",
            vec![0; 16 * 21 / 8],
            16,
            21,
            13,
            metrics,
        ));
        let mut table = CodePageTable::new();
        let mut cp = CodePage::new("CP");
        cp.add_code_point("LA010000", 0x81);
        table.insert(cp);
        font.resolve_code_points(&table, "CP", Charset::Cp500);
        font
    }

    #[test]
    fn test_em_factor() {
        let font = font_with(GlyphMetrics::default());
        assert_eq!(em_factor(&font), 1000.0);
    }

    #[test]
    fn test_synthesize_glyph() {
        let font = font_with(GlyphMetrics {
            ascender: 500,
            descender: 100,
            a_space: 20,
            b_space: 400,
            c_space: 30,
            baseline_shift: 500,
            advance: 450,
        });
        let glyph = synthesize_glyph(&font, font.glyph("LA010000").unwrap()).unwrap();
        assert_eq!(glyph.ch, 'a');
        assert_eq!(glyph.advance, 450);
        assert_eq!(glyph.box_height, 1000);
        assert_eq!(glyph.mask_width, 13);
        assert_eq!(glyph.mask_height, 21);
        assert_eq!(glyph.scale_x, 400.0);
        assert_eq!(glyph.scale_y, 600.0);
        assert_eq!(glyph.shift_x, 20);
        assert_eq!(glyph.shift_y, 100.0);
    }

    #[test]
    fn test_baseline_shift_above_char_height() {
        let font = font_with(GlyphMetrics {
            ascender: 300,
            descender: -50,
            baseline_shift: 400,
            ..Default::default()
        });
        let glyph = synthesize_glyph(&font, font.glyph("LA010000").unwrap()).unwrap();
        // descender clamps to 0, then 400 - 250 is added unscaled
        assert_eq!(glyph.shift_y, 200.0 + 150.0);
    }

    #[test]
    fn test_unmapped_glyph() {
        let font = FontProperties::new();
        let glyph = GlyphProperties::new("X", vec![0], 8, 1, 1, GlyphMetrics::default());
        assert!(synthesize_glyph(&font, &glyph).is_none());
    }
}
