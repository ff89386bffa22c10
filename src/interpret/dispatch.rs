//! Record dispatch.
//!
//! Every record kind maps to at most one handler in a [`HandlerTable`].
//! [`HandlerTable::base`] only maintains session state (media, code pages,
//! fonts, images); [`HandlerTable::straight`] starts from it and replaces the
//! entries that produce output. Any entry can be replaced with
//! [`HandlerTable::set`].
//!
//! # Example
//!
//! ```
//! use afpdf::compose::RecordingComposer;
//! use afpdf::interpret::{HandlerTable, Interpreter, Session};
//! use afpdf::record::{Record, RecordKind, VecSource};
//! use afpdf::Result;
//!
//! fn count_pages(session: &mut Session, _: &mut RecordingComposer, _: &Record) -> Result<()> {
//!     session.begin_page();
//!     Ok(())
//! }
//!
//! let mut handlers = HandlerTable::straight();
//! handlers.set(RecordKind::EndPage, count_pages);
//!
//! let mut interpreter = Interpreter::new(RecordingComposer::new()).with_handlers(handlers);
//! interpreter
//!     .run(VecSource::new(vec![Record::EndPage, Record::EndPage]))
//!     .unwrap();
//! assert_eq!(interpreter.session().page_count(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;

use super::image::ImageBuilder;
use super::options::InterpretOptions;
use super::session::Session;
use super::text::interpret_text;
use crate::compose::PageComposer;
use crate::error::Result;
use crate::record::{Record, RecordKind, RecordSource};
use crate::units::to_points;

/// Handler for one record kind.
pub type Handler<C> = fn(&mut Session, &mut C, &Record) -> Result<()>;

/// Handlers keyed by record kind. Kinds without an entry are skipped.
pub struct HandlerTable<C> {
    handlers: HashMap<RecordKind, Handler<C>>,
}

impl<C> HandlerTable<C> {
    /// Table without any handler.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Install `handler` for `kind`, returning the one it replaces.
    pub fn set(&mut self, kind: RecordKind, handler: Handler<C>) -> Option<Handler<C>> {
        self.handlers.insert(kind, handler)
    }

    /// Handler installed for `kind`.
    pub fn get(&self, kind: RecordKind) -> Option<Handler<C>> {
        self.handlers.get(&kind).copied()
    }

    /// Remove the handler for `kind`.
    pub fn remove(&mut self, kind: RecordKind) -> Option<Handler<C>> {
        self.handlers.remove(&kind)
    }

    /// Number of kinds with a handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is installed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C: PageComposer> HandlerTable<C> {
    /// Bookkeeping handlers: build the resource tables without composing.
    pub fn base() -> Self {
        let mut table = Self::empty();

        table.set(RecordKind::BeginMediumMap, begin_medium_map);
        table.set(RecordKind::MediumDescriptor, medium_descriptor);
        table.set(RecordKind::EndMediumMap, end_medium_map);
        table.set(RecordKind::InvokeMediumMap, invoke_medium_map);
        table.set(RecordKind::PagePosition, page_position);

        table.set(RecordKind::BeginCodePage, begin_code_page);
        table.set(RecordKind::CodePageIndex, code_page_index);
        table.set(RecordKind::EndCodePage, end_code_page);

        table.set(RecordKind::BeginFont, begin_font);
        table.set(RecordKind::FontControl, font_control);
        table.set(RecordKind::FontDescriptor, font_descriptor);
        table.set(RecordKind::FontPosition, font_position);
        table.set(RecordKind::FontIndex, font_index);
        table.set(RecordKind::FontPatternsMap, font_patterns_map);
        table.set(RecordKind::FontPatterns, font_patterns);
        table.set(RecordKind::EndFont, end_font);

        table.set(RecordKind::MapCodedFont, map_coded_font);
        table.set(RecordKind::BeginPage, begin_page);
        table.set(RecordKind::EndPage, end_page);

        table.set(RecordKind::BeginImageObject, begin_image_object);
        table.set(RecordKind::ObjectAreaPosition, object_area_position);
        table.set(RecordKind::ImageDataDescriptor, image_data_descriptor);
        table.set(RecordKind::ImagePictureData, image_picture_data);
        table.set(RecordKind::EndImageObject, end_image_object);

        table
    }

    /// Base handlers plus composition of fonts, text, rules, images and pages.
    pub fn straight() -> Self {
        let mut table = Self::base();
        table.set(RecordKind::MapCodedFont, compose_fonts);
        table.set(RecordKind::EndPage, compose_page_break);
        table.set(RecordKind::PresentationTextData, compose_text);
        table.set(RecordKind::EndImageObject, compose_image);
        table
    }

    /// Route one record to its handler.
    pub fn dispatch(&self, session: &mut Session, composer: &mut C, record: &Record) -> Result<()> {
        match self.get(record.kind()) {
            Some(handler) => handler(session, composer, record),
            None => {
                log::trace!("{} skipped", record.kind());
                Ok(())
            }
        }
    }
}

impl<C> Clone for HandlerTable<C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C> fmt::Debug for HandlerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.handlers.keys().map(|k| k.acronym()).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerTable").field("kinds", &kinds).finish()
    }
}

// -------------------------------------------------------------------------
// Media
// -------------------------------------------------------------------------

fn begin_medium_map<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::BeginMediumMap { name } = record {
        session.begin_medium(name);
    }
    Ok(())
}

fn medium_descriptor<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::MediumDescriptor {
        x_unit_base,
        x_units_per_unit_base,
        x_extent,
        y_extent,
    } = record
    {
        session.describe_medium(*x_unit_base, *x_units_per_unit_base, (*x_extent, *y_extent));
    }
    Ok(())
}

fn end_medium_map<C>(session: &mut Session, _: &mut C, _: &Record) -> Result<()> {
    session.end_medium();
    Ok(())
}

fn invoke_medium_map<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    match record {
        Record::InvokeMediumMap { name } => session.invoke_medium(name),
        _ => Ok(()),
    }
}

fn page_position<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::PagePosition { x_origin, y_origin } = record {
        session.set_page_position(*x_origin, *y_origin);
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Code pages
// -------------------------------------------------------------------------

fn begin_code_page<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::BeginCodePage { name } = record {
        session.begin_code_page(name);
    }
    Ok(())
}

fn code_page_index<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::CodePageIndex { entries } = record {
        session.add_code_points(entries);
    }
    Ok(())
}

fn end_code_page<C>(session: &mut Session, _: &mut C, _: &Record) -> Result<()> {
    session.end_code_page();
    Ok(())
}

// -------------------------------------------------------------------------
// Fonts
// -------------------------------------------------------------------------

fn begin_font<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::BeginFont { name } = record {
        log::debug!("begin font {}", name);
    }
    session.begin_font();
    Ok(())
}

fn font_control<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontControl {
        pattern_technology,
        pattern_alignment,
        max_box_width,
        max_box_height,
    } = record
    {
        let warnings = match session.font_builder() {
            Some(font) => font.control(
                *pattern_technology,
                *pattern_alignment,
                *max_box_width,
                *max_box_height,
            ),
            None => return Ok(()),
        };
        for warning in warnings {
            session.warn(warning);
        }
    }
    Ok(())
}

fn font_descriptor<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontDescriptor {
        nominal_vertical_size,
    } = record
    {
        if let Some(font) = session.font_builder() {
            font.descriptor(*nominal_vertical_size);
        }
    }
    Ok(())
}

fn font_position<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontPosition { groups } = record {
        if let Some(font) = session.font_builder() {
            font.position(groups);
        }
    }
    Ok(())
}

fn font_index<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontIndex { entries } = record {
        if let Some(font) = session.font_builder() {
            if !font.index(entries) {
                log::debug!("font index for another rotation ignored");
            }
        }
    }
    Ok(())
}

fn font_patterns_map<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontPatternsMap { entries } = record {
        if let Some(font) = session.font_builder() {
            font.patterns_map(entries);
        }
    }
    Ok(())
}

fn font_patterns<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::FontPatterns { data } = record {
        if let Some(font) = session.font_builder() {
            font.patterns(data);
        }
    }
    Ok(())
}

fn end_font<C>(session: &mut Session, _: &mut C, _: &Record) -> Result<()> {
    session.end_font()
}

fn map_coded_font<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::MapCodedFont { groups } = record {
        session.map_coded_font(groups);
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Pages
// -------------------------------------------------------------------------

fn begin_page<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    let page = session.begin_page();
    if let Record::BeginPage { name } = record {
        log::debug!("page {} ({})", page, name);
    }
    Ok(())
}

fn end_page<C>(session: &mut Session, _: &mut C, _: &Record) -> Result<()> {
    log::trace!("end of page {}", session.page_count());
    Ok(())
}

// -------------------------------------------------------------------------
// Images
// -------------------------------------------------------------------------

fn begin_image_object<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let Record::BeginImageObject { name } = record {
        session.image = Some(ImageBuilder::new(name.clone()));
    }
    Ok(())
}

fn object_area_position<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let (Record::ObjectAreaPosition { x_origin, y_origin }, Some(image)) =
        (record, session.image.as_mut())
    {
        image.set_origin(*x_origin, *y_origin);
    }
    Ok(())
}

fn image_data_descriptor<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let (
        Record::ImageDataDescriptor {
            width,
            height,
            bilevel_color,
        },
        Some(image),
    ) = (record, session.image.as_mut())
    {
        image.describe(*width, *height, *bilevel_color);
    }
    Ok(())
}

fn image_picture_data<C>(session: &mut Session, _: &mut C, record: &Record) -> Result<()> {
    if let (Record::ImagePictureData { data }, Some(image)) = (record, session.image.as_mut()) {
        image.append(data);
    }
    Ok(())
}

fn end_image_object<C>(session: &mut Session, _: &mut C, _: &Record) -> Result<()> {
    if let Some(image) = session.image.take() {
        log::debug!(
            "image {} {}x{}, {} bytes",
            image.name,
            image.width,
            image.height,
            image.data().len()
        );
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Composition
// -------------------------------------------------------------------------

fn compose_fonts<C: PageComposer>(
    session: &mut Session,
    composer: &mut C,
    record: &Record,
) -> Result<()> {
    let Record::MapCodedFont { groups } = record else {
        return Ok(());
    };
    if !session.map_coded_font(groups) {
        return Ok(());
    }
    let handles = session
        .fonts()
        .iter()
        .map(|font| composer.add_raster_font(font))
        .collect::<Result<Vec<_>>>()?;
    log::debug!("{} fonts registered", handles.len());
    session.set_font_handles(handles);
    Ok(())
}

fn compose_page_break<C: PageComposer>(
    session: &mut Session,
    composer: &mut C,
    record: &Record,
) -> Result<()> {
    end_page(session, composer, record)?;
    composer.page_break()
}

fn compose_text<C: PageComposer>(
    session: &mut Session,
    composer: &mut C,
    record: &Record,
) -> Result<()> {
    match record {
        Record::PresentationTextData { controls } => interpret_text(session, composer, controls),
        _ => Ok(()),
    }
}

fn compose_image<C: PageComposer>(
    session: &mut Session,
    composer: &mut C,
    _: &Record,
) -> Result<()> {
    let Some(image) = session.image.take() else {
        log::warn!("end image object without begin image object, ignored");
        return Ok(());
    };
    if image.data().len() < image.expected_len() {
        log::warn!(
            "image {} has {} bytes, {}x{} needs {}",
            image.name,
            image.data().len(),
            image.width,
            image.height,
            image.expected_len()
        );
    }
    let (x_offset, y_offset) = session.page_offset();
    composer.add_image(
        &image.bitmap(),
        image.width,
        image.height,
        to_points(image.x_origin.saturating_add(x_offset)),
        to_points(image.y_origin.saturating_add(y_offset)),
    )
}

// -------------------------------------------------------------------------
// Interpreter
// -------------------------------------------------------------------------

/// Drives a record stream through a handler table into a composer.
#[derive(Debug)]
pub struct Interpreter<C> {
    session: Session,
    composer: C,
    handlers: HandlerTable<C>,
    records: u64,
}

impl<C: PageComposer> Interpreter<C> {
    /// Interpreter with default options and the straight handler table.
    pub fn new(composer: C) -> Self {
        Self::with_options(composer, InterpretOptions::default())
    }

    /// Interpreter with the given options and the straight handler table.
    pub fn with_options(composer: C, options: InterpretOptions) -> Self {
        Self {
            session: Session::new(options),
            composer,
            handlers: HandlerTable::straight(),
            records: 0,
        }
    }

    /// Replace the handler table.
    pub fn with_handlers(mut self, handlers: HandlerTable<C>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Process one record.
    pub fn process(&mut self, record: &Record) -> Result<()> {
        self.records += 1;
        self.handlers
            .dispatch(&mut self.session, &mut self.composer, record)
    }

    /// Process records until the source is exhausted.
    pub fn run<S: RecordSource>(&mut self, mut source: S) -> Result<()> {
        while let Some(record) = source.next_record()? {
            self.process(&record)?;
        }
        log::debug!(
            "{} records, {} pages, {} fonts",
            self.records,
            self.session.page_count(),
            self.session.fonts().len()
        );
        Ok(())
    }

    /// Close the composer and hand back the session and composer.
    pub fn finish(mut self) -> Result<(Session, C)> {
        self.composer.close()?;
        Ok(self.into_parts())
    }

    /// Number of records processed.
    pub fn records_processed(&self) -> u64 {
        self.records
    }

    /// Session state built so far.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The composer being driven.
    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Session and composer, without closing the composer.
    pub fn into_parts(self) -> (Session, C) {
        (self.session, self.composer)
    }
}
