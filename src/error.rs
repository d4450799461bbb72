//! Error types for SEG-Y operations.

use std::io;
use thiserror::Error;

/// All errors that can occur when working with SEG-Y files.
///
/// Every variant maps to a stable integer code via [`Error::code`], suitable
/// for process exit statuses and foreign callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Seeking (or addressing past the mapped region) failed.
    #[error("seek failed: {0}")]
    Seek(#[source] io::Error),

    /// Reading from the file failed or came up short.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing to the file failed or came up short.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// Opening the file failed.
    #[error("open failed: {0}")]
    Open(#[source] io::Error),

    /// The byte offset does not name a field in this header.
    #[error("no field at byte offset {0}")]
    InvalidField(i32),

    /// The inline/crossline headers did not admit a sorting direction.
    #[error("unable to determine sorting from inline/crossline headers")]
    InvalidSorting,

    /// The deduced geometry does not multiply out to the trace count.
    #[error("inline, crossline and offset counts are inconsistent with the trace count")]
    InvalidOffsets,

    /// A nonsense argument: bad mode string, wrong buffer length, etc.
    #[error("invalid argument: {0}")]
    InvalidArgs(String),

    /// The requested line number is not present in the line index.
    #[error("line {0} is not in the line index")]
    MissingLineIndex(i32),

    /// The region past the headers is not a whole number of traces.
    #[error("trace data of {data_size} bytes is not a whole number of {trace_size}-byte traces")]
    TraceSizeMismatch { data_size: u64, trace_size: u64 },

    /// The file cannot be memory mapped (e.g. it is empty).
    #[error("file cannot be memory mapped")]
    MmapInvalid,

    /// The memory mapping syscall failed.
    #[error("memory mapping failed: {0}")]
    Mmap(#[source] io::Error),

    /// Binary-header and trace-header sample intervals are both set but
    /// disagree.
    #[error("sample interval mismatch: binary header says {binary} us, trace header says {trace} us")]
    IntervalMismatch { binary: i32, trace: i32 },
}

impl Error {
    /// The stable integer code for this error.
    ///
    /// `0` is reserved for success and never returned here.
    pub fn code(&self) -> i32 {
        match self {
            Error::Seek(_) => 1,
            Error::Read(_) => 2,
            Error::Write(_) => 3,
            Error::Open(_) => 4,
            Error::InvalidField(_) => 5,
            Error::InvalidSorting => 6,
            Error::InvalidOffsets => 7,
            Error::InvalidArgs(_) => 8,
            Error::MissingLineIndex(_) => 9,
            Error::TraceSizeMismatch { .. } => 10,
            Error::MmapInvalid => 11,
            Error::Mmap(_) => 12,
            // No dedicated code; the caller handed us contradictory sources.
            Error::IntervalMismatch { .. } => 8,
        }
    }
}
