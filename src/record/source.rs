//! Pull-based record sources.

use std::io::{Read, Write};

use serde_json::de::IoRead;
use serde_json::StreamDeserializer;

use super::Record;
use crate::error::{Error, Result};

/// An ordered, pull-based sequence of records.
///
/// `Ok(None)` is the normal end of the stream. Any `Err` is a decoder error
/// and aborts interpretation.
pub trait RecordSource {
    /// Pull the next record.
    fn next_record(&mut self) -> Result<Option<Record>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn next_record(&mut self) -> Result<Option<Record>> {
        (**self).next_record()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn next_record(&mut self) -> Result<Option<Record>> {
        (**self).next_record()
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    records: std::vec::IntoIter<Record>,
}

impl VecSource {
    /// Create a source yielding `records` in order.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl From<Vec<Record>> for VecSource {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Result<Option<Record>> {
        Ok(self.records.next())
    }
}

/// Records serialized as a stream of JSON values, typically one per line.
pub struct JsonRecordSource<R: Read> {
    stream: StreamDeserializer<'static, IoRead<R>, Record>,
    position: usize,
}

impl<R: Read> JsonRecordSource<R> {
    /// Read records from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(reader).into_iter(),
            position: 0,
        }
    }
}

impl<R: Read> RecordSource for JsonRecordSource<R> {
    fn next_record(&mut self) -> Result<Option<Record>> {
        match self.stream.next() {
            None => Ok(None),
            Some(Ok(record)) => {
                self.position += 1;
                Ok(Some(record))
            }
            Some(Err(e)) if e.is_io() => Err(Error::Io(e.into())),
            Some(Err(e)) => Err(Error::Decoder(format!(
                "record {}: {}",
                self.position + 1,
                e
            ))),
        }
    }
}

/// Write records as JSON lines, the format read by [`JsonRecordSource`].
pub fn write_json_lines<W: Write>(mut writer: W, records: &[Record]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_order() {
        let mut source = VecSource::new(vec![Record::BeginPresentationText, Record::EndPage]);
        assert_eq!(
            source.next_record().unwrap(),
            Some(Record::BeginPresentationText)
        );
        assert_eq!(source.next_record().unwrap(), Some(Record::EndPage));
        assert_eq!(source.next_record().unwrap(), None);
        assert_eq!(source.next_record().unwrap(), None);
    }

    #[test]
    fn test_json_lines_round_trip() {
        let records = vec![
            Record::BeginMediumMap { name: "M1".into() },
            Record::PagePosition {
                x_origin: 100,
                y_origin: 200,
            },
            Record::EndMediumMap,
        ];
        let mut buf = Vec::new();
        write_json_lines(&mut buf, &records).unwrap();

        let mut source = JsonRecordSource::new(buf.as_slice());
        let mut read = Vec::new();
        while let Some(record) = source.next_record().unwrap() {
            read.push(record);
        }
        assert_eq!(read, records);
    }

    #[test]
    fn test_json_source_reports_bad_record() {
        let data = b"{\"kind\":\"end_page\"}\n{\"kind\":\"no_such_field\"}\n";
        let mut source = JsonRecordSource::new(&data[..]);
        assert!(source.next_record().unwrap().is_some());
        let err = source.next_record().unwrap_err();
        assert!(matches!(err, Error::Decoder(ref msg) if msg.starts_with("record 2")));
    }
}
