//! Document model types for reconstructed AFP resources.
//!
//! Media, code pages and fonts are accumulated from the record stream and
//! become read-only once their end record has been seen.

mod charset;
mod code_page;
mod font;
mod medium;

pub use charset::Charset;
pub use code_page::{CodePage, CodePageTable, DEFAULT_CODE_PAGE};
pub use font::{
    cell_width_for, invert_bits, FontProperties, GlyphMetrics, GlyphProperties, ResolveStats,
};
pub use medium::Medium;
