//! Interpretation options and configuration.

use crate::model::{Charset, DEFAULT_CODE_PAGE};

/// Options for interpreting a record stream.
#[derive(Debug, Clone)]
pub struct InterpretOptions {
    /// Character set of code points and transparent text data
    pub charset: Charset,

    /// Code page substituted when a font refers to an unknown one
    pub default_code_page: String,
}

impl InterpretOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character set.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the fallback code page name.
    pub fn with_default_code_page(mut self, name: impl Into<String>) -> Self {
        self.default_code_page = name.into();
        self
    }
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            charset: Charset::Cp500,
            default_code_page: DEFAULT_CODE_PAGE.to_string(),
        }
    }
}
