//! Record interpretation: session state, font and image assembly, text, and
//! the handler table that ties them to record kinds.

mod dispatch;
mod font_builder;
mod image;
mod options;
mod session;
mod text;

pub use dispatch::{Handler, HandlerTable, Interpreter};
pub use font_builder::{extract_glyph, FontBuilder};
pub use image::ImageBuilder;
pub use options::InterpretOptions;
pub use session::{Session, SUPPORTED_UNITS_PER_UNIT_BASE};
pub use text::{baseline_shift, interpret_text, TextState};
