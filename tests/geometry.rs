mod common;

use common::{small, temp_path, Volume};
use segy::{field, geometry, CubeGeometry, Error, SampleFormat, SegyFile, Sorting, TraceField};

const IL: i32 = TraceField::Inline3D as i32;
const XL: i32 = TraceField::Crossline3D as i32;

#[test]
fn small_cube_geometry() {
    let (path, trace0, trace_bsize) = small("small_cube_geometry");
    let mut f = SegyFile::open(&path, "rb").unwrap();

    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();

    assert_eq!(cube.sorting, Sorting::Inline);
    assert_eq!(cube.trace_count, 25);
    assert_eq!(cube.offset_count, 1);
    assert_eq!(cube.inline_count, 5);
    assert_eq!(cube.crossline_count, 5);
    assert_eq!(cube.inline_indices, vec![1, 2, 3, 4, 5]);
    assert_eq!(cube.crossline_indices, vec![20, 21, 22, 23, 24]);
    assert_eq!(cube.offset_indices, vec![1]);
    assert_eq!(cube.inline_stride(), 1);
    assert_eq!(cube.crossline_stride(), 5);

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn trace_count_matches_file_size() {
    let (path, trace0, trace_bsize) = small("trace_count_matches_file_size");
    let mut f = SegyFile::open(&path, "rb").unwrap();

    let traces = geometry::trace_count(&mut f, trace0, trace_bsize).unwrap();
    let size = f.size().unwrap();
    assert_eq!(traces * (240 + trace_bsize as u64), size - trace0);

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn truncated_file_is_a_size_mismatch() {
    let (path, trace0, trace_bsize) = small("truncated_file");

    let size = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(size - 17).unwrap();
    drop(file);

    let mut f = SegyFile::open(&path, "rb").unwrap();
    assert!(matches!(
        geometry::trace_count(&mut f, trace0, trace_bsize),
        Err(Error::TraceSizeMismatch { .. })
    ));

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn strides_agree_with_a_naive_scan() {
    let (path, trace0, trace_bsize) = small("strides_vs_naive");
    let mut f = SegyFile::open(&path, "rb").unwrap();

    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();

    // Collect every (il, xl) pair in file order.
    let mut pairs = Vec::new();
    for traceno in 0..cube.trace_count as u32 {
        let header = f.read_trace_header(traceno, trace0, trace_bsize).unwrap();
        pairs.push((
            field::get_field(&header, IL).unwrap(),
            field::get_field(&header, XL).unwrap(),
        ));
    }

    let mut naive_ilines: Vec<i32> = pairs.iter().map(|p| p.0).collect();
    naive_ilines.dedup();
    assert_eq!(naive_ilines, cube.inline_indices);
    assert_eq!(naive_ilines.len(), cube.inline_count as usize);

    let naive_xlines: Vec<i32> = pairs[..cube.crossline_count as usize]
        .iter()
        .map(|p| p.1)
        .collect();
    assert_eq!(naive_xlines, cube.crossline_indices);

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn transposed_fields_swap_the_axes() {
    let (path, trace0, trace_bsize) = small("transposed_fields");
    let mut f = SegyFile::open(&path, "rb").unwrap();

    let cube = CubeGeometry::scan(&mut f, XL, IL, trace0, trace_bsize).unwrap();

    assert_eq!(cube.sorting, Sorting::Crossline);
    assert_eq!(cube.inline_indices, vec![20, 21, 22, 23, 24]);
    assert_eq!(cube.crossline_indices, vec![1, 2, 3, 4, 5]);

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn prestack_offsets_are_counted() {
    let path = temp_path("prestack_offsets");
    let volume = Volume {
        ilines: vec![1, 2],
        xlines: vec![11, 12, 13],
        offsets: vec![100, 200],
        samples: 10,
        format: SampleFormat::IeeeFloat4,
        interval_us: 2000,
        ext_headers: 0,
    };
    let (trace0, trace_bsize) = common::build(&path, &volume);

    let mut f = SegyFile::open(&path, "rb").unwrap();
    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();

    assert_eq!(cube.sorting, Sorting::Inline);
    assert_eq!(cube.trace_count, 12);
    assert_eq!(cube.offset_count, 2);
    assert_eq!(cube.inline_count, 2);
    assert_eq!(cube.crossline_count, 3);
    assert_eq!(cube.inline_indices, vec![1, 2]);
    assert_eq!(cube.crossline_indices, vec![11, 12, 13]);
    assert_eq!(cube.offset_indices, vec![100, 200]);

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn single_line_and_single_trace_geometries() {
    // N x 1: five inlines of one crossline each.
    let path = temp_path("nx1_geometry");
    let volume = Volume {
        ilines: vec![1, 2, 3, 4, 5],
        xlines: vec![9],
        offsets: vec![1],
        samples: 5,
        format: SampleFormat::IeeeFloat4,
        interval_us: 1000,
        ext_headers: 0,
    };
    let (trace0, trace_bsize) = common::build(&path, &volume);

    let mut f = SegyFile::open(&path, "rb").unwrap();
    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();
    assert_eq!(cube.sorting, Sorting::Inline);
    assert_eq!(cube.inline_count, 5);
    assert_eq!(cube.crossline_count, 1);
    drop(f);
    std::fs::remove_file(&path).unwrap();

    // 1 x M: constant inline means crossline-sorted by the first tie-break.
    let path = temp_path("1xm_geometry");
    let volume = Volume {
        ilines: vec![7],
        xlines: vec![1, 2, 3],
        offsets: vec![1],
        samples: 5,
        format: SampleFormat::IeeeFloat4,
        interval_us: 1000,
        ext_headers: 0,
    };
    let (trace0, trace_bsize) = common::build(&path, &volume);

    let mut f = SegyFile::open(&path, "rb").unwrap();
    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();
    assert_eq!(cube.sorting, Sorting::Crossline);
    assert_eq!(cube.inline_count, 1);
    assert_eq!(cube.crossline_count, 3);
    drop(f);
    std::fs::remove_file(&path).unwrap();

    // 1 x 1: a single trace.
    let path = temp_path("1x1_geometry");
    let volume = Volume {
        ilines: vec![1],
        xlines: vec![1],
        offsets: vec![1],
        samples: 5,
        format: SampleFormat::IeeeFloat4,
        interval_us: 1000,
        ext_headers: 0,
    };
    let (trace0, trace_bsize) = common::build(&path, &volume);

    let mut f = SegyFile::open(&path, "rb").unwrap();
    let cube = CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize).unwrap();
    assert_eq!(cube.sorting, Sorting::Crossline);
    assert_eq!(cube.trace_count, 1);
    assert_eq!(cube.offset_count, 1);
    assert_eq!(cube.inline_count, 1);
    assert_eq!(cube.crossline_count, 1);
    drop(f);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn zero_width_fields_are_rejected() {
    let (path, trace0, trace_bsize) = small("zero_width_fields");
    let mut f = SegyFile::open(&path, "rb").unwrap();

    // 188 is between field starts; 2 is inside the first field.
    assert!(matches!(
        geometry::sorting(&mut f, 188, XL, trace0, trace_bsize),
        Err(Error::InvalidField(188))
    ));
    assert!(matches!(
        geometry::sorting(&mut f, IL, 2, trace0, trace_bsize),
        Err(Error::InvalidField(2))
    ));
    assert!(matches!(
        geometry::offset_count(&mut f, 188, XL, 25, trace0, trace_bsize),
        Err(Error::InvalidField(188))
    ));

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn sample_interval_reconciliation() {
    let (path, trace0, trace_bsize) = small("sample_interval");

    // Both sources agree: 4000 us -> 4 ms.
    let mut f = SegyFile::open(&path, "r+b").unwrap();
    assert_eq!(geometry::sample_interval(&mut f, 0.0).unwrap(), 4.0);

    let indexes = geometry::sample_indexes(&mut f, 1111.0, 0.0, 4).unwrap();
    assert_eq!(indexes, vec![1111.0, 1115.0, 1119.0, 1123.0]);

    // Zero out the binary header interval: the trace header wins.
    let mut bin = f.read_binary_header().unwrap();
    field::set_bfield(&mut bin, segy::BinField::Interval, 0).unwrap();
    f.write_binary_header(&bin).unwrap();
    assert_eq!(geometry::sample_interval(&mut f, 0.0).unwrap(), 4.0);

    // Zero out both: the fallback wins.
    let mut header = f.read_trace_header(0, trace0, trace_bsize).unwrap();
    field::set_field(&mut header, TraceField::SampleInterval, 0).unwrap();
    f.write_trace_header(0, &header, trace0, trace_bsize).unwrap();
    assert_eq!(geometry::sample_interval(&mut f, 2.5).unwrap(), 2.5);

    // Binary set, trace zero: the binary header wins.
    field::set_bfield(&mut bin, segy::BinField::Interval, 3000).unwrap();
    f.write_binary_header(&bin).unwrap();
    assert_eq!(geometry::sample_interval(&mut f, 0.0).unwrap(), 3.0);

    // Both set but different: a contradiction.
    field::set_field(&mut header, TraceField::SampleInterval, 2000).unwrap();
    f.write_trace_header(0, &header, trace0, trace_bsize).unwrap();
    assert!(matches!(
        geometry::sample_interval(&mut f, 0.0),
        Err(Error::IntervalMismatch { binary: 3000, trace: 2000 })
    ));

    drop(f);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn inconsistent_cube_is_invalid_offsets() {
    // Rewrite the second inline's crosslines to 13, 10, 11: the crossline
    // numbers then wrap after four cells, and 6 traces do not divide into
    // lines of four.
    let path = temp_path("inconsistent_cube");
    let volume = Volume {
        ilines: vec![1, 2],
        xlines: vec![10, 11, 12],
        offsets: vec![1],
        samples: 5,
        format: SampleFormat::IeeeFloat4,
        interval_us: 1000,
        ext_headers: 0,
    };
    let (trace0, trace_bsize) = common::build(&path, &volume);

    let mut f = SegyFile::open(&path, "r+b").unwrap();
    for (traceno, xl) in [(3u32, 13), (4, 10), (5, 11)] {
        let mut header = f.read_trace_header(traceno, trace0, trace_bsize).unwrap();
        field::set_field(&mut header, TraceField::Crossline3D, xl).unwrap();
        f.write_trace_header(traceno, &header, trace0, trace_bsize).unwrap();
    }

    assert!(matches!(
        CubeGeometry::scan(&mut f, IL, XL, trace0, trace_bsize),
        Err(Error::InvalidOffsets)
    ));

    drop(f);
    std::fs::remove_file(path).unwrap();
}
