//! Human-readable dumps of reconstructed fonts.

use std::fmt::Write;

use crate::model::{FontProperties, GlyphProperties};

/// Character drawn for an ink pixel.
const INK: char = '0';

/// Character drawn for a background pixel.
const BACKGROUND: char = '.';

/// Dump font metrics followed by every glyph with its bitmap.
pub fn dump_font(font: &FontProperties) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nominal size: {}", font.nominal_size);
    let _ = writeln!(
        out,
        "max box W/H: {}x{}",
        font.max_character_width, font.max_character_height
    );
    let _ = writeln!(out, "max asc/desc {}/{}", font.max_ascender, font.max_descender);
    if let Some(ref name) = font.code_page_name {
        let _ = writeln!(out, "code page: {}", name);
    }

    for glyph in font.glyphs() {
        out.push('\n');
        dump_glyph(&mut out, glyph);
    }
    out
}

fn dump_glyph(out: &mut String, glyph: &GlyphProperties) {
    let metrics = glyph.metrics();
    let _ = writeln!(out, "{}", glyph.gcgid());
    match (glyph.code_point(), glyph.code_point_native()) {
        (Some(ch), Some(native)) => {
            let _ = writeln!(out, "Code point: {} ({}), EBCDIC: {}", ch as u32, ch, native);
        }
        (None, Some(native)) => {
            let _ = writeln!(out, "Code point: -, EBCDIC: {}", native);
        }
        _ => {
            let _ = writeln!(out, "Code point: unmapped");
        }
    }
    let _ = writeln!(
        out,
        "cell dimension: {}({})x{}",
        glyph.cell_width(),
        glyph.char_width(),
        glyph.cell_height()
    );
    let _ = writeln!(out, " bytes: {}", glyph.bitmap().len());
    let _ = writeln!(out, "character increment {}", metrics.advance);
    let _ = writeln!(
        out,
        "A-B-C space {} {} {}",
        metrics.a_space, metrics.b_space, metrics.c_space
    );
    let _ = writeln!(out, "baseline shift {}", metrics.baseline_shift);
    let _ = writeln!(
        out,
        "ascender/descender {}/{}",
        metrics.ascender, metrics.descender
    );
    out.push_str(&dump_glyph_bitmap(glyph));
}

/// Draw the full cell of a glyph, one text line per pixel row.
pub fn dump_glyph_bitmap(glyph: &GlyphProperties) -> String {
    let mut out = String::with_capacity(((glyph.cell_width() + 1) * glyph.cell_height()) as usize);
    for y in 0..glyph.cell_height() {
        for x in 0..glyph.cell_width() {
            out.push(if glyph.pixel(x, y) { INK } else { BACKGROUND });
        }
        out.push('\n');
    }
    out
}
