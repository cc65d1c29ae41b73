//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::texture::PixelFormat;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// the header declares tables larger than the file
    #[error("archive tables need {required} bytes but only {available} remain")]
    #[diagnostic(code(rpack::truncated_tables))]
    TruncatedTables { required: u64, available: u64 },

    /// offset of {units} units is outside the addressable range
    #[error("offset of {units} units is outside the addressable range")]
    OffsetOverflow { units: u64 },

    /// byte range lies outside of its source
    #[error("byte range {offset}+{size} lies outside of a {len} byte source")]
    OutOfBounds { offset: u64, size: u64, len: u64 },

    /// decompression failed: {0}
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// physical record {0} is out of range
    #[error("physical record {0} is out of range")]
    PhysicalRecordOutOfRange(usize),

    /// section {0} does not exist
    #[error("section {0} does not exist")]
    InvalidSection(usize),

    /// section {0} has no readable data
    #[error("section {0} has no readable data")]
    SectionUnavailable(usize),

    /// logical resource {0} does not exist
    #[error("logical resource {0} does not exist")]
    ResourceNotFound(usize),

    /// resource needs more parts
    #[error("resource needs {required} parts but only has {actual}")]
    NotEnoughParts { required: usize, actual: usize },

    /// pixel format {0:?} has no DXGI equivalent
    #[error("pixel format {0:?} has no DXGI equivalent")]
    MissingDxgiFormat(PixelFormat),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
