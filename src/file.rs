//! The SEG-Y file handle: open/close, optional memory mapping, and
//! random-access header, trace, and line I/O.
//!
//! A [`SegyFile`] always owns a file descriptor; [`SegyFile::mmap`] upgrades
//! it with a shared mapping. Every operation addresses the file through
//! `read_exact_at`/`write_all_at`, which copy through the mapping when one
//! is present and seek+read/write otherwise, so the two I/O paths are a
//! runtime choice invisible to callers.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::error::Error;
use crate::field::SampleFormat;
use crate::{encoding, ibm};
use crate::{BINARY_HEADER_SIZE, TEXT_HEADER_SIZE, TRACE_HEADER_SIZE};

enum Mapping {
    Ro(Mmap),
    Rw(MmapMut),
}

impl Mapping {
    fn as_slice(&self) -> &[u8] {
        match self {
            Mapping::Ro(m) => m,
            Mapping::Rw(m) => m,
        }
    }
}

/// An open SEG-Y file.
///
/// Handles are single-threaded: operations take `&mut self` and perform
/// blocking I/O. Writes through a mapping become visible to other readers
/// of the same file only after [`flush`](SegyFile::flush).
pub struct SegyFile {
    file: File,
    writable: bool,
    mapping: Option<Mapping>,
}

impl SegyFile {
    /// Opens a file with an `fopen`-style mode string (`"rb"`, `"r+b"`,
    /// `"w+b"`, ...).
    ///
    /// The mode must start with `r`, `w` or `a`, optionally followed by `+`
    /// and/or `b`; anything else is [`Error::InvalidArgs`].
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, Error> {
        let mut chars = mode.chars();
        let primary = chars
            .next()
            .ok_or_else(|| Error::InvalidArgs("empty mode string".to_string()))?;
        let plus = mode.contains('+');
        if !matches!(primary, 'r' | 'w' | 'a') || !chars.all(|c| matches!(c, '+' | 'b')) {
            return Err(Error::InvalidArgs(format!("unintelligible mode {mode:?}")));
        }

        let mut opts = OpenOptions::new();
        match primary {
            'r' => {
                opts.read(true).write(plus);
            }
            'w' => {
                opts.write(true).create(true).truncate(true).read(plus);
            }
            // Append-position writes make no sense for a format addressed
            // absolutely; 'a' keeps existing content but writes anywhere.
            'a' => {
                opts.write(true).create(true).read(plus);
            }
            _ => unreachable!(),
        }

        let file = opts.open(path).map_err(Error::Open)?;
        Ok(SegyFile {
            file,
            writable: plus || primary != 'r',
            mapping: None,
        })
    }

    /// Whether the handle was opened with write permission.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// The file size in bytes.
    pub fn size(&self) -> Result<u64, Error> {
        let meta = self.file.metadata().map_err(Error::Seek)?;
        Ok(meta.len())
    }

    /// Memory-maps the file, shared, sized to its current length.
    ///
    /// The mapping requests write permission when the handle is writable.
    /// Subsequent reads (and writes, for writable handles) go through the
    /// mapping instead of the descriptor. An empty file cannot be mapped.
    pub fn mmap(&mut self) -> Result<(), Error> {
        let size = self.size()?;
        if size == 0 {
            return Err(Error::MmapInvalid);
        }

        let mapping = if self.writable {
            let m = unsafe { MmapOptions::new().map_mut(&self.file) }.map_err(Error::Mmap)?;
            Mapping::Rw(m)
        } else {
            let m = unsafe { MmapOptions::new().map(&self.file) }.map_err(Error::Mmap)?;
            Mapping::Ro(m)
        };
        self.mapping = Some(mapping);
        Ok(())
    }

    /// Whether the handle currently addresses the file through a mapping.
    pub fn is_mapped(&self) -> bool {
        self.mapping.is_some()
    }

    /// Flushes pending writes.
    ///
    /// Synchronous flush completes before returning; asynchronous flush only
    /// schedules the writeback and applies to the mapped region alone.
    pub fn flush(&mut self, asynchronous: bool) -> Result<(), Error> {
        if let Some(Mapping::Rw(m)) = &self.mapping {
            let res = if asynchronous { m.flush_async() } else { m.flush() };
            res.map_err(Error::Write)?;
        }
        if !asynchronous && self.writable {
            self.file.sync_data().map_err(Error::Write)?;
        }
        Ok(())
    }

    /// Flushes, unmaps, and closes the file, reporting the first failure.
    ///
    /// Dropping the handle performs the same teardown with errors ignored.
    pub fn close(mut self) -> Result<(), Error> {
        self.flush(false)?;
        self.mapping = None;
        Ok(())
    }

    fn read_exact_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<(), Error> {
        if let Some(mapping) = &self.mapping {
            let map = mapping.as_slice();
            let start = pos as usize;
            let end = start + buf.len();
            if pos >= map.len() as u64 || end > map.len() {
                return Err(Error::Seek(std::io::Error::from(
                    std::io::ErrorKind::UnexpectedEof,
                )));
            }
            buf.copy_from_slice(&map[start..end]);
            return Ok(());
        }

        self.file.seek(SeekFrom::Start(pos)).map_err(Error::Seek)?;
        self.file.read_exact(buf).map_err(Error::Read)
    }

    fn write_all_at(&mut self, pos: u64, buf: &[u8]) -> Result<(), Error> {
        if let Some(Mapping::Rw(map)) = &mut self.mapping {
            let start = pos as usize;
            let end = start + buf.len();
            if pos >= map.len() as u64 || end > map.len() {
                return Err(Error::Seek(std::io::Error::from(
                    std::io::ErrorKind::UnexpectedEof,
                )));
            }
            map[start..end].copy_from_slice(buf);
            return Ok(());
        }

        // Read-only mappings stay the read surface; writes take the
        // descriptor path.
        self.file.seek(SeekFrom::Start(pos)).map_err(Error::Seek)?;
        self.file.write_all(buf).map_err(Error::Write)
    }

    /// Byte position of trace `traceno` given the first-trace offset and the
    /// trace's sample-body size.
    fn trace_pos(traceno: u32, trace0: u64, trace_bsize: u32) -> u64 {
        trace0 + traceno as u64 * (TRACE_HEADER_SIZE as u32 + trace_bsize) as u64
    }

    // ---- Header I/O ----

    /// Reads the mandatory textual header, transcoded to ASCII.
    pub fn read_text_header(&mut self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; TEXT_HEADER_SIZE];
        self.read_exact_at(0, &mut buf)?;
        encoding::ebcdic_to_ascii(&mut buf);
        Ok(buf)
    }

    /// Writes a textual header from ASCII, transcoding to EBCDIC.
    ///
    /// Index 0 is the mandatory header at the start of the file; index >= 1
    /// is the extended header at `3600 + (index - 1) * 3200`, and must not
    /// exceed the extended-header count declared in the binary header.
    pub fn write_text_header(&mut self, index: u32, text: &[u8]) -> Result<(), Error> {
        if text.len() != TEXT_HEADER_SIZE {
            return Err(Error::InvalidArgs(format!(
                "textual header must be {TEXT_HEADER_SIZE} bytes, got {}",
                text.len()
            )));
        }

        let pos = if index == 0 {
            0
        } else {
            let bin = self.read_binary_header()?;
            let declared = crate::field::get_bfield(&bin, crate::field::BinField::ExtendedHeaders)?;
            if declared < 0 || index as i64 > declared as i64 {
                return Err(Error::InvalidArgs(format!(
                    "extended header {index} out of range (file declares {declared})"
                )));
            }
            (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE) as u64
                + (index as u64 - 1) * TEXT_HEADER_SIZE as u64
        };

        let mut buf = text.to_vec();
        encoding::ascii_to_ebcdic(&mut buf);
        self.write_all_at(pos, &buf)
    }

    /// Reads the 400-byte binary header.
    pub fn read_binary_header(&mut self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; BINARY_HEADER_SIZE];
        self.read_exact_at(TEXT_HEADER_SIZE as u64, &mut buf)?;
        Ok(buf)
    }

    /// Writes the 400-byte binary header.
    pub fn write_binary_header(&mut self, header: &[u8]) -> Result<(), Error> {
        if header.len() != BINARY_HEADER_SIZE {
            return Err(Error::InvalidArgs(format!(
                "binary header must be {BINARY_HEADER_SIZE} bytes, got {}",
                header.len()
            )));
        }
        self.write_all_at(TEXT_HEADER_SIZE as u64, header)
    }

    /// Reads the 240-byte header of trace `traceno`.
    pub fn read_trace_header(
        &mut self,
        traceno: u32,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; TRACE_HEADER_SIZE];
        self.read_exact_at(Self::trace_pos(traceno, trace0, trace_bsize), &mut buf)?;
        Ok(buf)
    }

    /// Writes the 240-byte header of trace `traceno`.
    pub fn write_trace_header(
        &mut self,
        traceno: u32,
        header: &[u8],
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<(), Error> {
        if header.len() != TRACE_HEADER_SIZE {
            return Err(Error::InvalidArgs(format!(
                "trace header must be {TRACE_HEADER_SIZE} bytes, got {}",
                header.len()
            )));
        }
        self.write_all_at(Self::trace_pos(traceno, trace0, trace_bsize), header)
    }

    // ---- Trace body I/O ----

    /// Reads the raw (on-disk byte order) sample body of trace `traceno`.
    pub fn read_trace_data(
        &mut self,
        traceno: u32,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; trace_bsize as usize];
        let pos = Self::trace_pos(traceno, trace0, trace_bsize) + TRACE_HEADER_SIZE as u64;
        self.read_exact_at(pos, &mut buf)?;
        Ok(buf)
    }

    /// Writes the raw sample body of trace `traceno`.
    pub fn write_trace_data(
        &mut self,
        traceno: u32,
        data: &[u8],
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<(), Error> {
        if data.len() != trace_bsize as usize {
            return Err(Error::InvalidArgs(format!(
                "trace body must be {trace_bsize} bytes, got {}",
                data.len()
            )));
        }
        let pos = Self::trace_pos(traceno, trace0, trace_bsize) + TRACE_HEADER_SIZE as u64;
        self.write_all_at(pos, data)
    }

    /// Reads trace `traceno` and converts its samples to native floats.
    ///
    /// Rejects sample formats that are not four bytes wide rather than
    /// mis-sizing the trace.
    pub fn read_samples(
        &mut self,
        traceno: u32,
        format: SampleFormat,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<Vec<f32>, Error> {
        require_four_byte(format)?;
        let mut buf = self.read_trace_data(traceno, trace0, trace_bsize)?;
        ibm::to_native(format, &mut buf);
        Ok(buf
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes(b.try_into().unwrap()))
            .collect())
    }

    /// Converts native floats to the on-disk format and writes them as the
    /// sample body of trace `traceno`.
    ///
    /// The slice must hold exactly the trace's sample count; otherwise the
    /// file is left untouched.
    pub fn write_samples(
        &mut self,
        traceno: u32,
        samples: &[f32],
        format: SampleFormat,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<(), Error> {
        require_four_byte(format)?;
        if samples.len() * 4 != trace_bsize as usize {
            return Err(Error::InvalidArgs(format!(
                "expected {} samples, got {}",
                trace_bsize / 4,
                samples.len()
            )));
        }
        let mut buf: Vec<u8> = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();
        ibm::from_native(format, &mut buf);
        self.write_trace_data(traceno, &buf, trace0, trace_bsize)
    }

    // ---- Line I/O ----

    /// Reads a whole inline or crossline into one contiguous buffer.
    ///
    /// Starting at `line_trace0`, reads `line_length` traces stepping
    /// `stride * offsets` traces at a time, converting each body to native
    /// floats. The result holds `line_length * samples_per_trace` values.
    #[allow(clippy::too_many_arguments)]
    pub fn read_line(
        &mut self,
        line_trace0: u32,
        line_length: u32,
        stride: u32,
        offsets: u32,
        format: SampleFormat,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<Vec<f32>, Error> {
        let step = stride * offsets;
        let mut out = Vec::with_capacity(line_length as usize * (trace_bsize / 4) as usize);
        let mut traceno = line_trace0;

        for _ in 0..line_length {
            out.extend(self.read_samples(traceno, format, trace0, trace_bsize)?);
            traceno += step;
        }

        Ok(out)
    }

    /// Writes a whole inline or crossline from one contiguous buffer.
    ///
    /// The inverse of [`read_line`](SegyFile::read_line): `samples` must
    /// hold `line_length * samples_per_trace` native floats.
    #[allow(clippy::too_many_arguments)]
    pub fn write_line(
        &mut self,
        line_trace0: u32,
        line_length: u32,
        stride: u32,
        offsets: u32,
        samples: &[f32],
        format: SampleFormat,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<(), Error> {
        let per_trace = trace_bsize as usize / 4;
        if samples.len() != line_length as usize * per_trace {
            return Err(Error::InvalidArgs(format!(
                "expected {} samples for the line, got {}",
                line_length as usize * per_trace,
                samples.len()
            )));
        }

        let step = stride * offsets;
        let mut traceno = line_trace0;

        for chunk in samples.chunks_exact(per_trace) {
            self.write_samples(traceno, chunk, format, trace0, trace_bsize)?;
            traceno += step;
        }

        Ok(())
    }
}

impl Drop for SegyFile {
    fn drop(&mut self) {
        let _ = self.flush(false);
    }
}

fn require_four_byte(format: SampleFormat) -> Result<(), Error> {
    if format.bytes_per_sample() != 4 {
        return Err(Error::InvalidArgs(format!(
            "sample format {} is not 4 bytes wide",
            format.name()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_strings() {
        assert!(matches!(
            SegyFile::open("/no/such/dir/file.sgy", ""),
            Err(Error::InvalidArgs(_))
        ));
        assert!(matches!(
            SegyFile::open("/no/such/dir/file.sgy", "foo"),
            Err(Error::InvalidArgs(_))
        ));
        assert!(matches!(
            SegyFile::open("/no/such/dir/file.sgy", "rb"),
            Err(Error::Open(_))
        ));
    }

    #[test]
    fn trace_positions() {
        // 50 samples of 4 bytes: 240 + 200 = 440 bytes per trace.
        assert_eq!(SegyFile::trace_pos(0, 3600, 200), 3600);
        assert_eq!(SegyFile::trace_pos(1, 3600, 200), 4040);
        assert_eq!(SegyFile::trace_pos(24, 3600, 200), 3600 + 24 * 440);
        // Positions are 64-bit: a many-gigabyte file does not wrap.
        assert_eq!(
            SegyFile::trace_pos(3_000_000, 3600, 4000),
            3600 + 3_000_000u64 * 4240
        );
    }
}
