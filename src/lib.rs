//! # segy
//!
//! Read and write SEG-Y seismic files: textual/binary/trace headers, trace
//! and line data, and the cube geometry (inline x crossline x offset) that
//! a file's trace headers imply.
//!
//! ## Reading a trace
//!
//! ```no_run
//! use segy::{field, SegyFile};
//!
//! let mut f = SegyFile::open("survey.sgy", "rb")?;
//! let bin = f.read_binary_header()?;
//!
//! let format = field::format(&bin)?;
//! let trace0 = field::trace0(&bin)?;
//! let trace_bsize = field::trace_bsize(field::sample_count(&bin)?);
//!
//! let samples = f.read_samples(0, format, trace0, trace_bsize)?;
//! println!("first sample: {}", samples[0]);
//! # Ok::<(), segy::Error>(())
//! ```
//!
//! ## Scanning the cube geometry
//!
//! ```no_run
//! use segy::{field, CubeGeometry, SegyFile, TraceField};
//!
//! let mut f = SegyFile::open("survey.sgy", "rb")?;
//! let bin = f.read_binary_header()?;
//! let trace0 = field::trace0(&bin)?;
//! let trace_bsize = field::trace_bsize(field::sample_count(&bin)?);
//!
//! let cube = CubeGeometry::scan(
//!     &mut f,
//!     TraceField::Inline3D as i32,
//!     TraceField::Crossline3D as i32,
//!     trace0,
//!     trace_bsize,
//! )?;
//! println!("{} x {} x {}", cube.inline_count, cube.crossline_count, cube.offset_count);
//! # Ok::<(), segy::Error>(())
//! ```
//!
//! ## Memory-mapped access
//!
//! ```no_run
//! use segy::SegyFile;
//!
//! let mut f = SegyFile::open("survey.sgy", "r+b")?;
//! f.mmap()?;
//! // subsequent reads and writes copy through the mapping
//! # Ok::<(), segy::Error>(())
//! ```
//!
//! All multi-byte fields on disk are big-endian; textual headers are EBCDIC
//! on disk and ASCII in memory; samples convert between the on-disk IBM (or
//! big-endian IEEE) representation and native floats. The library is
//! single-threaded and blocking, and never logs.

pub mod encoding;
pub mod error;
pub mod field;
pub mod file;
pub mod geometry;
pub mod ibm;

pub use error::Error;
pub use field::{BinField, FieldWidth, SampleFormat, TraceField};
pub use file::SegyFile;
pub use geometry::{CubeGeometry, Sorting};

/// Size of the (extended) textual header in bytes.
pub const TEXT_HEADER_SIZE: usize = 3200;
/// Size of the binary header in bytes.
pub const BINARY_HEADER_SIZE: usize = 400;
/// Size of a trace header in bytes.
pub const TRACE_HEADER_SIZE: usize = 240;
