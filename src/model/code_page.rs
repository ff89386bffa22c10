//! Code pages map graphic character global ids to code points.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Code page substituted when a font refers to one that is not in the stream.
pub const DEFAULT_CODE_PAGE: &str = "T1D0BASE";

/// A named code page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodePage {
    /// Code page name
    pub name: String,

    code_points: HashMap<String, u16>,
}

impl CodePage {
    /// Create an empty code page.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code_points: HashMap::new(),
        }
    }

    /// Insert or overwrite the code point of a glyph.
    pub fn add_code_point(&mut self, gcgid: impl Into<String>, code_point: u16) {
        self.code_points.insert(gcgid.into(), code_point);
    }

    /// Code point of a glyph.
    pub fn code_point(&self, gcgid: &str) -> Option<u16> {
        self.code_points.get(gcgid).copied()
    }

    /// Number of mapped glyphs.
    pub fn len(&self) -> usize {
        self.code_points.len()
    }

    /// Check if the code page maps no glyph.
    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty()
    }
}

/// All code pages of a document, plus the one being built.
#[derive(Debug, Clone)]
pub struct CodePageTable {
    pages: HashMap<String, CodePage>,
    current: Option<CodePage>,
    default_name: String,
}

impl CodePageTable {
    /// Create an empty table falling back to [`DEFAULT_CODE_PAGE`].
    pub fn new() -> Self {
        Self::with_default(DEFAULT_CODE_PAGE)
    }

    /// Create an empty table with a custom fallback code page name.
    pub fn with_default(default_name: impl Into<String>) -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            default_name: default_name.into(),
        }
    }

    /// Name substituted for unknown code pages.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Start a new, empty code page and make it active.
    pub fn begin_code_page(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Some(open) = self.current.take() {
            log::warn!("code page {} was never ended, committing it", open.name);
            self.commit(open);
        }
        self.current = Some(CodePage::new(name));
    }

    /// Add a code point to the active code page.
    ///
    /// Returns `false` when no code page is being built.
    pub fn add_code_point(&mut self, gcgid: impl Into<String>, code_point: u16) -> bool {
        match self.current.as_mut() {
            Some(page) => {
                page.add_code_point(gcgid, code_point);
                true
            }
            None => false,
        }
    }

    /// Commit the active code page under its name.
    pub fn end_code_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.commit(page);
        }
    }

    fn commit(&mut self, page: CodePage) {
        log::debug!("code page {} ({} code points)", page.name, page.len());
        self.pages.insert(page.name.clone(), page);
    }

    /// Insert a finished code page.
    pub fn insert(&mut self, page: CodePage) {
        self.commit(page);
    }

    /// Look up a committed code page by exact name.
    pub fn get(&self, name: &str) -> Option<&CodePage> {
        self.pages.get(name)
    }

    /// Code page used for `name`: the page itself, or the default one.
    pub fn resolve(&self, name: &str) -> Option<&CodePage> {
        self.pages
            .get(name)
            .or_else(|| self.pages.get(&self.default_name))
    }

    /// Code point of `gcgid` in code page `name`, with default fallback.
    pub fn lookup(&self, name: &str, gcgid: &str) -> Option<u16> {
        self.resolve(name).and_then(|page| page.code_point(gcgid))
    }

    /// Number of committed code pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no code page was committed.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Default for CodePageTable {
    fn default() -> Self {
        Self::new()
    }
}
