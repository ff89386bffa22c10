//! Error types for afpdf library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for afpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the interpretation of a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when opening, reading, writing or closing a stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record stream is malformed or unreadable.
    #[error("Record decoding error: {0}")]
    Decoder(String),

    /// A record referenced a medium, font or code page that does not exist.
    #[error("Unknown {kind}: {name}")]
    Lookup {
        /// What was looked up
        kind: LookupKind,
        /// The name or id that was not found
        name: String,
    },

    /// Font pattern data does not cover the glyph cells it is supposed to hold.
    #[error("Corrupted font data: {0}")]
    DataCorruption(String),

    /// The page composer rejected an instruction.
    #[error("Composition error: {0}")]
    Compose(String),
}

impl Error {
    /// Build a lookup error.
    pub fn lookup(kind: LookupKind, name: impl Into<String>) -> Self {
        Error::Lookup {
            kind,
            name: name.into(),
        }
    }

    /// Coarse category of the error, used to pick a process exit code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Resource,
            Error::Decoder(_) => ErrorCategory::Decoder,
            Error::Lookup { .. } => ErrorCategory::Lookup,
            Error::DataCorruption(_) => ErrorCategory::DataCorruption,
            Error::Compose(_) => ErrorCategory::Compose,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Decoder(err.to_string())
        }
    }
}

/// Kind of object named by a [`Error::Lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Medium map name
    Medium,
    /// Code page name
    CodePage,
    /// Font local id
    Font,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Medium => write!(f, "medium map"),
            LookupKind::CodePage => write!(f, "code page"),
            LookupKind::Font => write!(f, "font"),
        }
    }
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Stream open/read/write/close failure
    Resource,
    /// Malformed record stream
    Decoder,
    /// Unknown reference
    Lookup,
    /// Pattern data inconsistent with its map
    DataCorruption,
    /// Output backend failure
    Compose,
}

/// Unsupported configuration found in the input.
///
/// Warnings never change control flow; processing continues with the only
/// supported defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Font pattern technology other than laser matrix N-bit wide.
    UnsupportedPatternTechnology(String),
    /// Raster pattern alignment other than 1 byte.
    UnsupportedPatternAlignment(String),
    /// Medium unit base other than 14400 units per 10 inches.
    UnsupportedUnitBase(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnsupportedPatternTechnology(t) => {
                write!(f, "only LaserMatrixNBitWide fonts supported (found {})", t)
            }
            Warning::UnsupportedPatternAlignment(a) => {
                write!(f, "only 1 byte raster pattern alignment supported (found {})", a)
            }
            Warning::UnsupportedUnitBase(u) => {
                write!(f, "only 1440 per inch medium supported (found {})", u)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::lookup(LookupKind::Medium, "M9");
        assert_eq!(err.to_string(), "Unknown medium map: M9");

        let err = Error::DataCorruption("glyph LA010000".to_string());
        assert_eq!(err.to_string(), "Corrupted font data: glyph LA010000");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Resource);
    }

    #[test]
    fn test_json_error_is_decoder_error() {
        let err: Error = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Decoder);
    }
}
