//! Session state of one document interpretation.
//!
//! The session owns every table built from the stream (media, code pages,
//! fonts) together with the objects under construction and the page/text
//! state that later records depend on. Handlers receive it explicitly.

use std::collections::HashMap;

use super::font_builder::FontBuilder;
use super::image::ImageBuilder;
use super::options::InterpretOptions;
use super::text::TextState;
use crate::compose::FontHandle;
use crate::error::{Error, LookupKind, Result, Warning};
use crate::model::{CodePageTable, FontProperties, Medium};
use crate::record::{CodePageEntry, MapCodedFontGroup, NameRole, UnitBase};

/// Units per unit base the interpreter supports (1440 per inch).
pub const SUPPORTED_UNITS_PER_UNIT_BASE: u16 = 14400;

/// Mutable state of one document interpretation.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) options: InterpretOptions,

    media: HashMap<String, Medium>,
    current_medium: Option<Medium>,

    code_pages: CodePageTable,

    font: Option<FontBuilder>,
    fonts: Vec<FontProperties>,
    fonts_resolved: bool,
    font_build_index: usize,
    font_handles: Vec<FontHandle>,

    page_offset: (i32, i32),
    pages: u32,

    pub(crate) text: TextState,
    pub(crate) image: Option<ImageBuilder>,

    warnings: Vec<Warning>,
}

impl Session {
    /// Create an empty session.
    pub fn new(options: InterpretOptions) -> Self {
        let code_pages = CodePageTable::with_default(options.default_code_page.clone());
        Self {
            options,
            media: HashMap::new(),
            current_medium: None,
            code_pages,
            font: None,
            fonts: Vec::new(),
            fonts_resolved: false,
            font_build_index: 0,
            font_handles: Vec::new(),
            page_offset: (0, 0),
            pages: 0,
            text: TextState::default(),
            image: None,
            warnings: Vec::new(),
        }
    }

    /// Options the session was created with.
    pub fn options(&self) -> &InterpretOptions {
        &self.options
    }

    /// Record an unsupported configuration.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Configuration warnings seen so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    // ---------------------------------------------------------------------
    // Media
    // ---------------------------------------------------------------------

    /// Start a medium map.
    pub fn begin_medium(&mut self, name: &str) {
        self.current_medium = Some(Medium::new(name));
    }

    /// Check the medium unit base and take the medium extent if present.
    pub fn describe_medium(
        &mut self,
        unit_base: UnitBase,
        units_per_unit_base: u16,
        extent: (Option<u32>, Option<u32>),
    ) {
        if unit_base != UnitBase::TenInches || units_per_unit_base != SUPPORTED_UNITS_PER_UNIT_BASE
        {
            self.warn(Warning::UnsupportedUnitBase(format!(
                "{} per {:?}",
                units_per_unit_base, unit_base
            )));
        }

        let Some(medium) = self.current_medium.as_mut() else {
            return;
        };
        let units_per_inch = units_per_unit_base as f32 / unit_base.inches();
        if units_per_inch > 0.0 {
            if let Some(w) = extent.0 {
                medium.width = w as f32 / units_per_inch;
            }
            if let Some(h) = extent.1 {
                medium.height = h as f32 / units_per_inch;
            }
        }
    }

    /// Set the page origin of the medium being defined.
    pub fn set_page_position(&mut self, x_origin: i32, y_origin: i32) {
        match self.current_medium.as_mut() {
            Some(medium) => {
                medium.x_origin = x_origin;
                medium.y_origin = y_origin;
            }
            None => log::warn!("page position outside of a medium map, ignored"),
        }
    }

    /// Commit the medium being defined.
    pub fn end_medium(&mut self) {
        if let Some(medium) = self.current_medium.take() {
            log::debug!(
                "medium {} origin ({}, {})",
                medium.name,
                medium.x_origin,
                medium.y_origin
            );
            self.media.insert(medium.name.clone(), medium);
        }
    }

    /// Make a committed medium active for all following page content.
    pub fn invoke_medium(&mut self, name: &str) -> Result<()> {
        let medium = self
            .media
            .get(name)
            .ok_or_else(|| Error::lookup(LookupKind::Medium, name))?;
        self.page_offset = medium.origin();
        Ok(())
    }

    /// Committed medium by name.
    pub fn medium(&self, name: &str) -> Option<&Medium> {
        self.media.get(name)
    }

    /// Number of committed media.
    pub fn medium_count(&self) -> usize {
        self.media.len()
    }

    /// Active page origin offsets `(x, y)` in 1/1440 inch.
    pub fn page_offset(&self) -> (i32, i32) {
        self.page_offset
    }

    // ---------------------------------------------------------------------
    // Code pages
    // ---------------------------------------------------------------------

    /// Start a code page.
    pub fn begin_code_page(&mut self, name: &str) {
        self.code_pages.begin_code_page(name);
    }

    /// Add code page index entries to the code page being defined.
    pub fn add_code_points(&mut self, entries: &[CodePageEntry]) {
        for entry in entries {
            if !self
                .code_pages
                .add_code_point(entry.gcgid.clone(), entry.code_point)
            {
                log::warn!("code page index outside of a code page, ignored");
                return;
            }
        }
    }

    /// Commit the code page being defined.
    pub fn end_code_page(&mut self) {
        self.code_pages.end_code_page();
    }

    /// All committed code pages.
    pub fn code_pages(&self) -> &CodePageTable {
        &self.code_pages
    }

    // ---------------------------------------------------------------------
    // Fonts
    // ---------------------------------------------------------------------

    /// Start a font, discarding any unfinished one.
    pub fn begin_font(&mut self) {
        if self.font.is_some() {
            log::warn!("font begun before the previous one ended, discarding it");
        }
        self.font = Some(FontBuilder::new());
    }

    /// Font being built, if any.
    pub fn font_builder(&mut self) -> Option<&mut FontBuilder> {
        if self.font.is_none() {
            log::warn!("font record outside of a font, ignored");
        }
        self.font.as_mut()
    }

    /// Finish the font being built and append it to the font list.
    pub fn end_font(&mut self) -> Result<()> {
        let Some(builder) = self.font.take() else {
            log::warn!("end font without begin font, ignored");
            return Ok(());
        };
        let font = builder.finish()?;
        self.fonts.push(font);
        Ok(())
    }

    /// Fonts in the order they were defined.
    pub fn fonts(&self) -> &[FontProperties] {
        &self.fonts
    }

    /// Font by 1-based local id.
    pub fn font(&self, local_id: u8) -> Result<&FontProperties> {
        (local_id as usize)
            .checked_sub(1)
            .and_then(|i| self.fonts.get(i))
            .ok_or_else(|| Error::lookup(LookupKind::Font, local_id.to_string()))
    }

    /// Composer handle of the font with 1-based local id.
    pub fn font_handle(&self, local_id: u8) -> Result<FontHandle> {
        (local_id as usize)
            .checked_sub(1)
            .and_then(|i| self.font_handles.get(i))
            .copied()
            .ok_or_else(|| Error::lookup(LookupKind::Font, local_id.to_string()))
    }

    /// Remember composer handles, in font list order.
    pub fn set_font_handles(&mut self, handles: Vec<FontHandle>) {
        self.font_handles = handles;
    }

    /// Whether glyph code points have been resolved.
    pub fn fonts_resolved(&self) -> bool {
        self.fonts_resolved
    }

    /// Resolve glyph code points from a map coded font record.
    ///
    /// The record repeats on every page but is only processed the first time.
    /// Returns whether resolution ran on this call.
    pub fn map_coded_font(&mut self, groups: &[MapCodedFontGroup]) -> bool {
        if self.fonts_resolved {
            return false;
        }
        self.fonts_resolved = true;

        for group in groups {
            for qualifier in &group.qualifiers {
                match qualifier.role {
                    NameRole::CodePageNameReference => {
                        self.resolve_font(self.font_build_index, &qualifier.name);
                        self.font_build_index += 1;
                    }
                    NameRole::FontCharacterSetNameReference => {
                        log::debug!("font character set {}", qualifier.name);
                    }
                    _ => {}
                }
            }
        }
        true
    }

    /// Assign code points from code page `code_page` to the font at `index`.
    pub fn resolve_font(&mut self, index: usize, code_page: &str) {
        let charset = self.options.charset;
        let defined = self.fonts.len();
        let Some(font) = self.fonts.get_mut(index) else {
            log::warn!(
                "code page {} mapped to font {}, but only {} fonts are defined",
                code_page,
                index + 1,
                defined
            );
            return;
        };
        if self.code_pages.get(code_page).is_none() {
            log::debug!(
                "code page {} not found, using {}",
                code_page,
                self.code_pages.default_name()
            );
        }
        let stats = font.resolve_code_points(&self.code_pages, code_page, charset);
        log::debug!(
            "font {} on code page {}: {} glyphs mapped, {} unmapped",
            index + 1,
            code_page,
            stats.resolved,
            stats.unmapped
        );
    }

    // ---------------------------------------------------------------------
    // Pages
    // ---------------------------------------------------------------------

    /// Count a page start.
    pub fn begin_page(&mut self) -> u32 {
        self.pages += 1;
        self.pages
    }

    /// Number of pages started.
    pub fn page_count(&self) -> u32 {
        self.pages
    }

    /// Current text state.
    pub fn text_state(&self) -> &TextState {
        &self.text
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(InterpretOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FullyQualifiedName;

    #[test]
    fn test_medium_invoke_sets_offsets() {
        let mut session = Session::default();
        session.begin_medium("M1");
        session.set_page_position(100, 200);
        session.end_medium();
        assert_eq!(session.page_offset(), (0, 0));

        session.invoke_medium("M1").unwrap();
        assert_eq!(session.page_offset(), (100, 200));
    }

    #[test]
    fn test_invoke_unknown_medium() {
        let mut session = Session::default();
        let err = session.invoke_medium("NOPE").unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup {
                kind: LookupKind::Medium,
                ..
            }
        ));
    }

    #[test]
    fn test_unit_base_warning() {
        let mut session = Session::default();
        session.begin_medium("M1");
        session.describe_medium(UnitBase::TenInches, 14400, (Some(12240), Some(15840)));
        assert!(session.warnings().is_empty());
        session.describe_medium(UnitBase::TenCentimeters, 14400, (None, None));
        assert_eq!(session.warnings().len(), 1);
        session.end_medium();

        let medium = session.medium("M1").unwrap();
        assert_eq!(medium.width, 8.5);
        assert_eq!(medium.height, 11.0);
    }

    #[test]
    fn test_metric_extent_is_converted_to_inches() {
        let mut session = Session::default();
        session.begin_medium("A4");
        session.describe_medium(UnitBase::TenCentimeters, 1000, (Some(2100), Some(2970)));
        session.end_medium();
        assert_eq!(session.warnings().len(), 1);

        let medium = session.medium("A4").unwrap();
        assert!((medium.width - 8.2677).abs() < 1e-3);
        assert!((medium.height - 11.6929).abs() < 1e-3);
    }

    #[test]
    fn test_font_local_id_is_one_based() {
        let mut session = Session::default();
        session.begin_font();
        session.font_builder().unwrap().descriptor(100);
        session.end_font().unwrap();
        session.begin_font();
        session.font_builder().unwrap().descriptor(240);
        session.end_font().unwrap();

        assert_eq!(session.font(1).unwrap().nominal_size, 10);
        assert_eq!(session.font(2).unwrap().nominal_size, 24);
        assert!(session.font(0).is_err());
        assert!(session.font(3).is_err());
    }

    #[test]
    fn test_map_coded_font_runs_once() {
        let mut session = Session::default();
        let groups = vec![MapCodedFontGroup {
            local_id: 1,
            qualifiers: vec![FullyQualifiedName {
                role: NameRole::CodePageNameReference,
                name: "T1V10500".into(),
            }],
        }];
        assert!(session.map_coded_font(&groups));
        assert!(session.fonts_resolved());
        assert!(!session.map_coded_font(&groups));
    }
}
