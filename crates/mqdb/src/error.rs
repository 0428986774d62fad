//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::types::RecordId;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is not a valid MQDB archive
    #[error("file is not a valid MQDB archive")]
    InvalidSignature,

    /// unsupported MQDB version {0}
    #[error("unsupported MQDB version {0}")]
    UnsupportedVersion(u32),

    /// table of contents contains records with non-unique id {0}
    #[error("table of contents contains records with non-unique id {0}")]
    DuplicateRecordId(RecordId),

    /// could not find the MQDB name list record
    #[error("could not find the MQDB name list record")]
    MissingNameList,

    /// read wrong MQRC signature for record {0}
    #[error("read wrong MQRC signature for record {0}")]
    BadRecordSignature(RecordId),

    /// unable to find requested record
    #[error("unable to find requested record")]
    RecordNotFound(#[from] RecordNotFoundError),
}

/// Error type to provide further information when a record has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested record")]
pub enum RecordNotFoundError {
    /// with id {0}
    #[error("with id {0}")]
    Id(RecordId),

    /// with name {0}
    #[error("with name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
