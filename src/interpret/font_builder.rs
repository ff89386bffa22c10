//! Raster font assembly from font object records.
//!
//! A font arrives as a Begin Font, a handful of metric records, one or more
//! font index tables (one per orientation), a patterns map and the pattern
//! data in chunks. Glyph bitmaps are cut out of the pattern data only when
//! the End Font record is seen, because the map may arrive before or after
//! the data it points into.

use std::collections::BTreeMap;

use crate::error::{Error, Result, Warning};
use crate::model::{cell_width_for, invert_bits, FontProperties, GlyphMetrics, GlyphProperties};
use crate::record::{
    FontIndexEntry, FontPositionGroup, PatternAlignment, PatternMapEntry, PatternTechnology,
};

/// A font under construction.
#[derive(Debug, Clone, Default)]
pub struct FontBuilder {
    font: FontProperties,
    index: BTreeMap<String, FontIndexEntry>,
    index_captured: bool,
    pattern_map: Vec<PatternMapEntry>,
    patterns: Vec<u8>,
}

impl FontBuilder {
    /// Start a font with zero metrics and empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply font control: maximum box size and the pattern configuration.
    ///
    /// Unsupported configurations are returned as warnings; assembly goes on
    /// assuming 1 byte aligned laser matrix patterns.
    pub fn control(
        &mut self,
        technology: PatternTechnology,
        alignment: PatternAlignment,
        max_box_width: u32,
        max_box_height: u32,
    ) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if technology != PatternTechnology::LaserMatrixNBitWide {
            warnings.push(Warning::UnsupportedPatternTechnology(format!("{:?}", technology)));
        }
        if alignment != PatternAlignment::OneByte {
            warnings.push(Warning::UnsupportedPatternAlignment(format!("{:?}", alignment)));
        }
        self.font.max_character_width = max_box_width;
        self.font.max_character_height = max_box_height;
        warnings
    }

    /// Apply the font descriptor. The nominal vertical size is in 1/10 point.
    pub fn descriptor(&mut self, nominal_vertical_size: i32) {
        self.font.nominal_size = nominal_vertical_size / 10;
    }

    /// Apply font position; only the first (0 degree) group is used.
    pub fn position(&mut self, groups: &[FontPositionGroup]) {
        if let Some(group) = groups.first() {
            self.font.max_ascender = group.max_ascender;
            self.font.max_descender = group.max_descender;
        }
    }

    /// Capture the font index. Only the first table (0 degree rotation) is
    /// kept; returns whether this table was captured.
    pub fn index(&mut self, entries: &[FontIndexEntry]) -> bool {
        if self.index_captured {
            return false;
        }
        self.index_captured = true;
        for entry in entries {
            self.index.insert(entry.gcgid.clone(), entry.clone());
        }
        true
    }

    /// Append patterns map entries.
    pub fn patterns_map(&mut self, entries: &[PatternMapEntry]) {
        self.pattern_map.extend_from_slice(entries);
    }

    /// Append a chunk of pattern data.
    pub fn patterns(&mut self, data: &[u8]) {
        self.patterns.extend_from_slice(data);
    }

    /// Pattern data accumulated so far.
    pub fn pattern_data(&self) -> &[u8] {
        &self.patterns
    }

    /// Number of glyphs in the captured index.
    pub fn indexed_glyphs(&self) -> usize {
        self.index.len()
    }

    /// Cut every indexed glyph out of the pattern data and finish the font.
    pub fn finish(self) -> Result<FontProperties> {
        let mut font = self.font;
        for (gcgid, metrics) in &self.index {
            let location = self
                .pattern_map
                .get(metrics.fnm_index as usize)
                .ok_or_else(|| {
                    Error::DataCorruption(format!(
                        "glyph {} refers to pattern {} of {}",
                        gcgid,
                        metrics.fnm_index,
                        self.pattern_map.len()
                    ))
                })?;
            font.add_glyph(extract_glyph(&self.patterns, gcgid, location, metrics)?);
        }
        log::debug!(
            "font finished: {} glyphs, {} pattern bytes",
            font.glyph_count(),
            self.patterns.len()
        );
        Ok(font)
    }
}

/// Build one glyph from its pattern location and index metrics.
pub fn extract_glyph(
    patterns: &[u8],
    gcgid: &str,
    location: &PatternMapEntry,
    metrics: &FontIndexEntry,
) -> Result<GlyphProperties> {
    let oversized = || {
        Error::DataCorruption(format!(
            "glyph {} has an oversized box {}x{}",
            gcgid, location.box_width, location.box_height
        ))
    };
    let char_width = location.box_width.checked_add(1).ok_or_else(oversized)?;
    let cell_width = cell_width_for(location.box_width).ok_or_else(oversized)?;
    let cell_height = location.box_height.checked_add(1).ok_or_else(oversized)?;
    let cell_bytes = (cell_width as usize)
        .checked_mul(cell_height as usize)
        .ok_or_else(oversized)?
        / 8;

    let start = location.pattern_offset as usize;
    let raster = start
        .checked_add(cell_bytes)
        .and_then(|end| patterns.get(start..end))
        .ok_or_else(|| {
            Error::DataCorruption(format!(
                "glyph {} needs {} bytes at offset {}, pattern data has {}",
                gcgid,
                cell_bytes,
                start,
                patterns.len()
            ))
        })?;

    Ok(GlyphProperties::new(
        gcgid,
        invert_bits(raster),
        cell_width,
        cell_height,
        char_width,
        GlyphMetrics {
            ascender: metrics.ascender_height,
            descender: metrics.descender_depth,
            a_space: metrics.a_space,
            b_space: metrics.b_space,
            c_space: metrics.c_space,
            baseline_shift: metrics.baseline_offset,
            advance: metrics.character_increment,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_entry(gcgid: &str, fnm_index: u32) -> FontIndexEntry {
        FontIndexEntry {
            gcgid: gcgid.to_string(),
            character_increment: 556,
            ascender_height: 700,
            descender_depth: 10,
            baseline_offset: 700,
            a_space: 40,
            b_space: 480,
            c_space: 36,
            fnm_index,
        }
    }

    #[test]
    fn test_cell_geometry() {
        let patterns = vec![0xFF; 64];
        let location = PatternMapEntry {
            box_width: 12,
            box_height: 20,
            pattern_offset: 0,
        };
        let glyph = extract_glyph(&patterns, "LA010000", &location, &index_entry("LA010000", 0))
            .unwrap();
        assert_eq!(glyph.cell_width(), 16);
        assert_eq!(glyph.cell_height(), 21);
        assert_eq!(glyph.char_width(), 13);
        assert_eq!(glyph.bitmap().len(), 42);
        assert!(glyph.bitmap().iter().all(|&b| b == 0));
        assert_eq!(glyph.metrics().advance, 556);
        assert_eq!(glyph.metrics().baseline_shift, 700);
    }

    #[test]
    fn test_slice_beyond_patterns_is_corruption() {
        let patterns = vec![0; 41];
        let location = PatternMapEntry {
            box_width: 12,
            box_height: 20,
            pattern_offset: 0,
        };
        let err = extract_glyph(&patterns, "LA010000", &location, &index_entry("LA010000", 0))
            .unwrap_err();
        assert!(matches!(err, Error::DataCorruption(_)));
    }

    #[test]
    fn test_oversized_box_is_corruption() {
        let patterns = vec![0; 4];
        let entry = index_entry("LA010000", 0);
        for (box_width, box_height) in [(u32::MAX, 0), (u32::MAX - 3, 0), (7, u32::MAX)] {
            let location = PatternMapEntry {
                box_width,
                box_height,
                pattern_offset: 0,
            };
            let err = extract_glyph(&patterns, "LA010000", &location, &entry).unwrap_err();
            assert!(matches!(err, Error::DataCorruption(_)));
        }
    }

    #[test]
    fn test_pattern_chunks_accumulate_in_order() {
        let mut builder = FontBuilder::new();
        let first: Vec<u8> = (0..10).collect();
        let second: Vec<u8> = (10..25).collect();
        builder.patterns(&first);
        builder.patterns(&second);
        assert_eq!(builder.pattern_data().len(), 25);
        assert_eq!(builder.pattern_data(), (0..25).collect::<Vec<u8>>().as_slice());
    }

    #[test]
    fn test_only_first_index_is_captured() {
        let mut builder = FontBuilder::new();
        assert!(builder.index(&[index_entry("LA010000", 0)]));
        assert!(!builder.index(&[index_entry("LA020000", 0), index_entry("LA030000", 1)]));
        assert_eq!(builder.indexed_glyphs(), 1);
    }

    #[test]
    fn test_control_warnings() {
        let mut builder = FontBuilder::new();
        let warnings = builder.control(
            PatternTechnology::CidKeyedOutline,
            PatternAlignment::FourByte,
            30,
            40,
        );
        assert_eq!(warnings.len(), 2);
        assert!(builder
            .control(PatternTechnology::LaserMatrixNBitWide, PatternAlignment::OneByte, 30, 40)
            .is_empty());
    }

    #[test]
    fn test_finish_uses_map_index_not_name() {
        let mut builder = FontBuilder::new();
        builder.descriptor(120);
        builder.position(&[
            FontPositionGroup {
                max_ascender: 750,
                max_descender: 210,
            },
            FontPositionGroup {
                max_ascender: 1,
                max_descender: 1,
            },
        ]);
        builder.index(&[index_entry("LA010000", 1), index_entry("LA020000", 0)]);
        builder.patterns_map(&[PatternMapEntry {
            box_width: 7,
            box_height: 0,
            pattern_offset: 0,
        }]);
        builder.patterns_map(&[PatternMapEntry {
            box_width: 7,
            box_height: 1,
            pattern_offset: 1,
        }]);
        builder.patterns(&[0x0F, 0xF0, 0x00]);

        let font = builder.finish().unwrap();
        assert_eq!(font.nominal_size, 12);
        assert_eq!(font.max_ascender, 750);
        assert_eq!(font.max_descender, 210);
        assert_eq!(font.glyph("LA020000").unwrap().bitmap(), &[0xF0]);
        assert_eq!(font.glyph("LA010000").unwrap().bitmap(), &[0x0F, 0xFF]);
    }

    #[test]
    fn test_finish_rejects_missing_map_entry() {
        let mut builder = FontBuilder::new();
        builder.index(&[index_entry("LA010000", 3)]);
        assert!(matches!(builder.finish(), Err(Error::DataCorruption(_))));
    }
}
