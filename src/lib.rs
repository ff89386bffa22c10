//! # afpdf
//!
//! AFP print stream interpretation for Rust.
//!
//! This library takes the structured fields of an AFP document (media maps,
//! code pages, raster fonts, image objects and presentation text) as typed
//! records, rebuilds the fonts and page geometry they describe, and hands
//! positioned text, rules, images and page breaks to a [`PageComposer`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use afpdf::{convert_file, JsonFormat};
//!
//! fn main() -> afpdf::Result<()> {
//!     // Interpret a record stream stored as JSON lines
//!     let conversion = convert_file("statement.jsonl")?;
//!
//!     // Recorded composition instructions
//!     let json = conversion.to_json(JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Raster fonts**: glyph bitmaps cut from font patterns, mapped through code pages
//! - **Page geometry**: medium origins, text cursor and rules in points
//! - **Images**: bilevel image objects placed on the page
//! - **Extensible dispatch**: per record kind handler tables
//! - **Recording backend**: composition instructions as JSON

pub mod compose;
pub mod error;
pub mod interpret;
pub mod model;
pub mod record;
pub mod units;

// Re-export commonly used types
pub use compose::{
    dump_font, ComposeCommand, FontHandle, JsonFormat, PageComposer, RecordingComposer, Rgb,
};
pub use error::{Error, ErrorCategory, LookupKind, Result, Warning};
pub use interpret::{HandlerTable, InterpretOptions, Interpreter, Session};
pub use model::{Charset, CodePage, CodePageTable, FontProperties, GlyphProperties, Medium};
pub use record::{JsonRecordSource, Record, RecordKind, RecordSource, VecSource};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Interpret every record of `source` into `composer` and close it.
///
/// # Example
///
/// ```
/// use afpdf::{convert, Record, RecordingComposer, VecSource};
///
/// let source = VecSource::new(vec![Record::BeginPage { name: "P1".into() }, Record::EndPage]);
/// let (session, composer) = convert(source, RecordingComposer::new()).unwrap();
/// assert_eq!(session.page_count(), 1);
/// assert!(composer.is_closed());
/// ```
pub fn convert<S, C>(source: S, composer: C) -> Result<(Session, C)>
where
    S: RecordSource,
    C: PageComposer,
{
    convert_with_options(source, composer, InterpretOptions::default())
}

/// Interpret every record of `source` with custom options.
pub fn convert_with_options<S, C>(
    source: S,
    composer: C,
    options: InterpretOptions,
) -> Result<(Session, C)>
where
    S: RecordSource,
    C: PageComposer,
{
    let mut interpreter = Interpreter::with_options(composer, options);
    interpreter.run(source)?;
    interpreter.finish()
}

/// Interpret a JSON record stream into a [`RecordingComposer`].
///
/// # Arguments
///
/// * `reader` - Any type implementing `Read`, yielding JSON records
pub fn convert_reader<R: Read>(reader: R) -> Result<Conversion> {
    convert_reader_with_options(reader, InterpretOptions::default())
}

/// Interpret a JSON record stream with custom options.
pub fn convert_reader_with_options<R: Read>(
    reader: R,
    options: InterpretOptions,
) -> Result<Conversion> {
    let (session, composer) =
        convert_with_options(JsonRecordSource::new(reader), RecordingComposer::new(), options)?;
    Ok(Conversion { session, composer })
}

/// Interpret a JSON record stream file.
///
/// # Example
///
/// ```no_run
/// use afpdf::convert_file;
///
/// let conversion = convert_file("statement.jsonl").unwrap();
/// println!("Pages: {}", conversion.page_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Conversion> {
    let file = File::open(path)?;
    convert_reader(BufReader::new(file))
}

/// Build the resources of a JSON record stream without composing pages.
///
/// Code points are resolved as soon as the first map coded font record is
/// seen, so the returned fonts are ready for [`dump_font`].
pub fn load_resources<R: Read>(reader: R, options: InterpretOptions) -> Result<Session> {
    let mut interpreter = Interpreter::with_options(RecordingComposer::new(), options)
        .with_handlers(HandlerTable::base());
    interpreter.run(JsonRecordSource::new(reader))?;
    let (session, _) = interpreter.into_parts();
    Ok(session)
}

/// Outcome of interpreting a document into a [`RecordingComposer`].
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Final interpretation state
    pub session: Session,
    /// Recorded composition instructions
    pub composer: RecordingComposer,
}

impl Conversion {
    /// Recorded instructions.
    pub fn commands(&self) -> &[ComposeCommand] {
        self.composer.commands()
    }

    /// Number of pages ended.
    pub fn page_count(&self) -> u32 {
        self.session.page_count()
    }

    /// Configuration warnings raised during interpretation.
    pub fn warnings(&self) -> &[Warning] {
        self.session.warnings()
    }

    /// Serialize the recorded instructions.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        self.composer.to_json(format)
    }
}
