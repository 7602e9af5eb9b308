use std::io;
use thiserror::Error;

/// Numeric error kinds, stable across the error variants below.
///
/// The discriminant is the kind code surfaced to callers that want a numeric
/// classification rather than a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorKind {
    ReadIo = 1,
    BadRecord = 2,
    BadBase = 3,
    StoreIo = 4,
    InvalidArg = 5,
    EmptyInput = 6,
    NoMers = 7,
}

/// Everything that can go wrong while counting k-mers.
///
/// Every operation in the crate propagates these unchanged; nothing is caught
/// and swallowed on the way up.
#[derive(Debug, Error)]
pub enum KmerError {
    #[error("error while reading the input stream: {0}")]
    ReadIo(io::Error),

    #[error("malformed record: sequence id does not begin with '@' (got {0:?})")]
    BadSeqId(String),

    #[error("malformed record: separator line does not begin with '+' (got {0:?})")]
    BadMarker(String),

    #[error("malformed record: input ended in the middle of a record")]
    TruncatedRecord,

    #[error("got invalid base pair with ASCII value : {ascii} (offset {offset})")]
    InvalidBase { ascii: u8, offset: usize },

    #[error("got invalid encoded value : {value}")]
    InvalidCode { value: u8 },

    #[error("k-mer store I/O failure: {0}")]
    StoreIo(#[from] io::Error),

    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("input ended before any record could be read")]
    EmptyInput,

    #[error("no k-mers were generated from the input")]
    NoMers,
}

impl KmerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KmerError::ReadIo(_) => ErrorKind::ReadIo,
            KmerError::BadSeqId(_) | KmerError::BadMarker(_) | KmerError::TruncatedRecord => {
                ErrorKind::BadRecord
            }
            KmerError::InvalidBase { .. } | KmerError::InvalidCode { .. } => ErrorKind::BadBase,
            KmerError::StoreIo(_) => ErrorKind::StoreIo,
            KmerError::InvalidArg(_) => ErrorKind::InvalidArg,
            KmerError::EmptyInput => ErrorKind::EmptyInput,
            KmerError::NoMers => ErrorKind::NoMers,
        }
    }

    /// The numeric code of this error's kind.
    pub fn code(&self) -> u32 {
        self.kind() as u32
    }
}
