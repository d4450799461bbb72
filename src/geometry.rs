//! Cube geometry analysis: deducing how a file's traces lay out as an
//! inline x crossline x offset volume from sparse trace-header evidence.
//!
//! Every operation takes the trace-header byte offsets naming the inline
//! and crossline fields, so files that use non-default conventions (e.g.
//! bytes 9/21 instead of 189/193) work unchanged. The offset field is fixed
//! at byte 37. Geometry is computed on demand from headers and never cached
//! in the file handle.

use crate::error::Error;
use crate::field::{get_field, trace_field_width, TraceField};
use crate::file::SegyFile;
use crate::TRACE_HEADER_SIZE;

/// Trace sorting direction: which line axis varies slowest along the file.
///
/// The discriminants follow the binary header's trace-sorting-code
/// convention. Inline-sorted means the crossline number varies fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Sorting {
    Crossline = 1,
    Inline = 2,
}

fn require_field(field: i32) -> Result<(), Error> {
    if trace_field_width(field).is_none() {
        return Err(Error::InvalidField(field));
    }
    Ok(())
}

/// The number of traces in the file.
///
/// The region past the headers must be a whole number of
/// `240 + trace_bsize` byte traces; a remainder means the file is
/// inconsistent with its own binary header and fails with
/// [`Error::TraceSizeMismatch`].
pub fn trace_count(file: &mut SegyFile, trace0: u64, trace_bsize: u32) -> Result<u64, Error> {
    let full_size = (TRACE_HEADER_SIZE as u32 + trace_bsize) as u64;
    let data_size = file.size()?.saturating_sub(trace0);

    if data_size % full_size != 0 {
        return Err(Error::TraceSizeMismatch {
            data_size,
            trace_size: full_size,
        });
    }

    Ok(data_size / full_size)
}

/// Deduces the sorting direction from the inline/crossline fields.
///
/// Compares the first trace against the last and against the first trace of
/// the next offset bin. The comparison order resolves the degenerate Nx1,
/// 1xM and 1x1 geometries: a constant inline field across the whole file
/// means crossline-sorted before anything else is considered.
pub fn sorting(
    file: &mut SegyFile,
    il: i32,
    xl: i32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<Sorting, Error> {
    require_field(il)?;
    require_field(xl)?;

    let header = file.read_trace_header(0, trace0, trace_bsize)?;
    let il0 = get_field(&header, il)?;
    let xl0 = get_field(&header, xl)?;
    let off0 = get_field(&header, TraceField::Offset)?;

    let traces = trace_count(file, trace0, trace_bsize)?;

    // Walk forward from trace 1 until the offset field comes back around to
    // the first trace's, i.e. to the first trace of the next
    // (inline, crossline) bin. Single-offset files stop at trace 1.
    let mut il1 = il0;
    let mut xl1 = xl0;
    let mut traceno = 1;
    while traceno < traces {
        let header = file.read_trace_header(traceno as u32, trace0, trace_bsize)?;
        il1 = get_field(&header, il)?;
        xl1 = get_field(&header, xl)?;
        let off1 = get_field(&header, TraceField::Offset)?;
        traceno += 1;
        if off1 == off0 {
            break;
        }
    }

    let header = file.read_trace_header(traces as u32 - 1, trace0, trace_bsize)?;
    let il_last = get_field(&header, il)?;
    let xl_last = get_field(&header, xl)?;

    if il0 == il_last {
        Ok(Sorting::Crossline)
    } else if xl0 == xl_last {
        Ok(Sorting::Inline)
    } else if il0 == il1 {
        Ok(Sorting::Inline)
    } else if xl0 == xl1 {
        Ok(Sorting::Crossline)
    } else {
        Err(Error::InvalidSorting)
    }
}

/// The number of offsets per (inline, crossline) bin.
///
/// Counts traces from the start of the file until either line field
/// changes; pre-stack files hold every offset of a bin contiguously.
pub fn offset_count(
    file: &mut SegyFile,
    il: i32,
    xl: i32,
    traces: u64,
    trace0: u64,
    trace_bsize: u32,
) -> Result<u32, Error> {
    require_field(il)?;
    require_field(xl)?;

    if traces == 1 {
        return Ok(1);
    }

    let header = file.read_trace_header(0, trace0, trace_bsize)?;
    let il0 = get_field(&header, il)?;
    let xl0 = get_field(&header, xl)?;

    let mut offsets: u32 = 0;
    loop {
        offsets += 1;
        if offsets as u64 == traces {
            break;
        }

        let header = file.read_trace_header(offsets, trace0, trace_bsize)?;
        let il1 = get_field(&header, il)?;
        let xl1 = get_field(&header, xl)?;
        if il1 != il0 || xl1 != xl0 {
            break;
        }
    }

    Ok(offsets)
}

/// Counts cells along the fast axis by stepping one bin at a time until the
/// line field wraps around to the first trace's value.
fn count_lines_fast_axis(
    file: &mut SegyFile,
    field: i32,
    offsets: u32,
    traces: u64,
    trace0: u64,
    trace_bsize: u32,
) -> Result<u32, Error> {
    let header = file.read_trace_header(0, trace0, trace_bsize)?;
    let first_lineno = get_field(&header, field)?;
    let first_offset = get_field(&header, TraceField::Offset)?;

    let mut lines: u32 = 1;
    let mut curr = offsets;

    // A single-bin file holds one line and nothing to wrap around to.
    while (curr as u64) < traces {
        let header = file.read_trace_header(curr, trace0, trace_bsize)?;
        let lineno = get_field(&header, field)?;
        let off = get_field(&header, TraceField::Offset)?;

        if off == first_offset && lineno == first_lineno {
            break;
        }

        curr += offsets;
        lines += 1;
    }

    Ok(lines)
}

/// Counts both line axes given the field naming the fast axis.
///
/// Returns `(slow, fast)`: the fast-axis count is measured by walking the
/// file; the slow-axis count is `trace_count / (fast * offsets)`.
pub fn count_lines(
    file: &mut SegyFile,
    fast_field: i32,
    offsets: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<(u32, u32), Error> {
    require_field(fast_field)?;

    let traces = trace_count(file, trace0, trace_bsize)?;
    let fast = count_lines_fast_axis(file, fast_field, offsets, traces, trace0, trace_bsize)?;

    let line_length = fast as u64 * offsets as u64;
    let slow = (traces / line_length) as u32;

    Ok((slow, fast))
}

/// Counts inlines and crosslines, dispatching on the sorting direction.
pub fn line_counts(
    file: &mut SegyFile,
    il: i32,
    xl: i32,
    sorting: Sorting,
    offsets: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<(u32, u32), Error> {
    match sorting {
        Sorting::Inline => {
            let (il_count, xl_count) = count_lines(file, xl, offsets, trace0, trace_bsize)?;
            Ok((il_count, xl_count))
        }
        Sorting::Crossline => {
            let (xl_count, il_count) = count_lines(file, il, offsets, trace0, trace_bsize)?;
            Ok((il_count, xl_count))
        }
    }
}

fn line_indices(
    file: &mut SegyFile,
    field: i32,
    stride: u32,
    count: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<Vec<i32>, Error> {
    require_field(field)?;

    let mut out = Vec::with_capacity(count as usize);
    let mut traceno = 0;
    for _ in 0..count {
        let header = file.read_trace_header(traceno, trace0, trace_bsize)?;
        out.push(get_field(&header, field)?);
        traceno += stride;
    }
    Ok(out)
}

/// Enumerates the inline numbers, in file order.
#[allow(clippy::too_many_arguments)]
pub fn inline_indices(
    file: &mut SegyFile,
    il: i32,
    sorting: Sorting,
    inline_count: u32,
    crossline_count: u32,
    offsets: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<Vec<i32>, Error> {
    let stride = match sorting {
        Sorting::Inline => crossline_count * offsets,
        Sorting::Crossline => offsets,
    };
    line_indices(file, il, stride, inline_count, trace0, trace_bsize)
}

/// Enumerates the crossline numbers, in file order.
#[allow(clippy::too_many_arguments)]
pub fn crossline_indices(
    file: &mut SegyFile,
    xl: i32,
    sorting: Sorting,
    inline_count: u32,
    crossline_count: u32,
    offsets: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<Vec<i32>, Error> {
    let stride = match sorting {
        Sorting::Inline => offsets,
        Sorting::Crossline => inline_count * offsets,
    };
    line_indices(file, xl, stride, crossline_count, trace0, trace_bsize)
}

/// Enumerates the offset numbers from the first bin's traces.
pub fn offset_indices(
    file: &mut SegyFile,
    offset_field: i32,
    offsets: u32,
    trace0: u64,
    trace_bsize: u32,
) -> Result<Vec<i32>, Error> {
    line_indices(file, offset_field, 1, offsets, trace0, trace_bsize)
}

/// Trace-index distance between consecutive traces of one inline.
pub fn inline_stride(sorting: Sorting, inline_count: u32) -> u32 {
    match sorting {
        Sorting::Inline => 1,
        Sorting::Crossline => inline_count,
    }
}

/// Trace-index distance between consecutive traces of one crossline.
pub fn crossline_stride(sorting: Sorting, crossline_count: u32) -> u32 {
    match sorting {
        Sorting::Inline => crossline_count,
        Sorting::Crossline => 1,
    }
}

/// The trace number where a line starts, at offset 0.
///
/// `lineno` is looked up in the enumerated line numbers `linenos`; a line
/// along the fast axis (stride 1) starts a whole line-length apart from its
/// neighbors, a slow-axis line starts one bin apart.
pub fn line_trace0(
    lineno: i32,
    line_length: u32,
    stride: u32,
    offsets: u32,
    linenos: &[i32],
) -> Result<u32, Error> {
    let index = linenos
        .iter()
        .position(|&x| x == lineno)
        .ok_or(Error::MissingLineIndex(lineno))? as u32;

    let index = if stride == 1 { index * line_length } else { index };

    Ok(index * offsets)
}

/// Reconciles the binary-header and first-trace sample intervals.
///
/// Both sources store microseconds; the result is milliseconds. The trace
/// header wins when both agree or only it is set, the binary header when
/// only it is set, and `fallback` when neither is. Two nonzero, disagreeing
/// sources are an error: the file contradicts itself and no preference is
/// defensible.
pub fn sample_interval(file: &mut SegyFile, fallback: f64) -> Result<f64, Error> {
    let bin = file.read_binary_header()?;
    let trace0 = crate::field::trace0(&bin)?;
    let samples = crate::field::sample_count(&bin)?;
    let trace_bsize = crate::field::trace_bsize(samples);

    let header = file.read_trace_header(0, trace0, trace_bsize)?;

    let bin_dt = crate::field::get_bfield(&bin, crate::field::BinField::Interval)?;
    let trace_dt = get_field(&header, TraceField::SampleInterval)?;

    match (bin_dt, trace_dt) {
        (0, 0) => Ok(fallback),
        (0, t) => Ok(t as f64 / 1000.0),
        (b, 0) => Ok(b as f64 / 1000.0),
        (b, t) if b == t => Ok(t as f64 / 1000.0),
        (b, t) => Err(Error::IntervalMismatch { binary: b, trace: t }),
    }
}

/// Enumerates the sample times `t0 + i * dt` in milliseconds.
pub fn sample_indexes(
    file: &mut SegyFile,
    t0: f64,
    fallback_dt: f64,
    count: usize,
) -> Result<Vec<f64>, Error> {
    let dt = sample_interval(file, fallback_dt)?;
    Ok((0..count).map(|i| t0 + i as f64 * dt).collect())
}

/// The complete deduced cube geometry of a file.
#[derive(Debug, Clone)]
pub struct CubeGeometry {
    pub sorting: Sorting,
    pub trace_count: u64,
    pub offset_count: u32,
    pub inline_count: u32,
    pub crossline_count: u32,
    pub inline_indices: Vec<i32>,
    pub crossline_indices: Vec<i32>,
    pub offset_indices: Vec<i32>,
}

impl CubeGeometry {
    /// Runs the full deduction: trace count, sorting, offsets, line counts,
    /// and index vectors.
    ///
    /// Fails with [`Error::InvalidOffsets`] when the deduced counts do not
    /// multiply out to the trace count, i.e. the file is not a consistent
    /// cube.
    pub fn scan(
        file: &mut SegyFile,
        il: i32,
        xl: i32,
        trace0: u64,
        trace_bsize: u32,
    ) -> Result<Self, Error> {
        let traces = trace_count(file, trace0, trace_bsize)?;
        let sorting = sorting(file, il, xl, trace0, trace_bsize)?;
        let offsets = offset_count(file, il, xl, traces, trace0, trace_bsize)?;
        let (inline_count, crossline_count) =
            line_counts(file, il, xl, sorting, offsets, trace0, trace_bsize)?;

        if inline_count as u64 * crossline_count as u64 * offsets as u64 != traces {
            return Err(Error::InvalidOffsets);
        }

        let inline_indices = inline_indices(
            file,
            il,
            sorting,
            inline_count,
            crossline_count,
            offsets,
            trace0,
            trace_bsize,
        )?;
        let crossline_indices = crossline_indices(
            file,
            xl,
            sorting,
            inline_count,
            crossline_count,
            offsets,
            trace0,
            trace_bsize,
        )?;
        let offset_indices = offset_indices(
            file,
            TraceField::Offset as i32,
            offsets,
            trace0,
            trace_bsize,
        )?;

        Ok(CubeGeometry {
            sorting,
            trace_count: traces,
            offset_count: offsets,
            inline_count,
            crossline_count,
            inline_indices,
            crossline_indices,
            offset_indices,
        })
    }

    /// Trace-index distance between consecutive traces of one inline.
    pub fn inline_stride(&self) -> u32 {
        inline_stride(self.sorting, self.inline_count)
    }

    /// Trace-index distance between consecutive traces of one crossline.
    pub fn crossline_stride(&self) -> u32 {
        crossline_stride(self.sorting, self.crossline_count)
    }

    /// Number of traces in one inline.
    pub fn inline_length(&self) -> u32 {
        self.crossline_count
    }

    /// Number of traces in one crossline.
    pub fn crossline_length(&self) -> u32 {
        self.inline_count
    }

    /// The trace number where inline `lineno` starts, at offset 0.
    pub fn inline_trace0(&self, lineno: i32) -> Result<u32, Error> {
        line_trace0(
            lineno,
            self.inline_length(),
            self.inline_stride(),
            self.offset_count,
            &self.inline_indices,
        )
    }

    /// The trace number where crossline `lineno` starts, at offset 0.
    pub fn crossline_trace0(&self, lineno: i32) -> Result<u32, Error> {
        line_trace0(
            lineno,
            self.crossline_length(),
            self.crossline_stride(),
            self.offset_count,
            &self.crossline_indices,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_trace0_lookup() {
        let linenos = [1, 2, 3, 4, 5];

        // Fast axis (stride 1): lines are line_length apart.
        assert_eq!(line_trace0(1, 5, 1, 1, &linenos).unwrap(), 0);
        assert_eq!(line_trace0(3, 5, 1, 1, &linenos).unwrap(), 10);
        // Slow axis: lines are one bin apart.
        assert_eq!(line_trace0(3, 5, 5, 1, &linenos).unwrap(), 2);
        // Offsets scale the result.
        assert_eq!(line_trace0(3, 5, 1, 2, &linenos).unwrap(), 20);

        assert!(matches!(
            line_trace0(3000, 5, 1, 1, &linenos),
            Err(Error::MissingLineIndex(3000))
        ));
    }

    #[test]
    fn strides_swap_with_sorting() {
        assert_eq!(inline_stride(Sorting::Inline, 5), 1);
        assert_eq!(inline_stride(Sorting::Crossline, 5), 5);
        assert_eq!(crossline_stride(Sorting::Inline, 7), 7);
        assert_eq!(crossline_stride(Sorting::Crossline, 7), 1);
    }

    #[test]
    fn sorting_codes() {
        assert_eq!(Sorting::Crossline as i32, 1);
        assert_eq!(Sorting::Inline as i32, 2);
    }
}
