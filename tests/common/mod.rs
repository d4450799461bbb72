#![allow(dead_code)]

//! Shared fixture builders for the integration tests.
//!
//! `small` reproduces the classic 25-trace test volume: 5 inlines (1..5),
//! 5 crosslines (20..24), one offset, 50 IBM-float samples per trace at a
//! 4000 us interval, inline-sorted. Sample `k` of the trace at inline `il`
//! and crossline position `x` holds `il + 0.2 + 0.01*x + 1e-5*k`.

use std::path::{Path, PathBuf};

use segy::{field, BinField, SampleFormat, SegyFile, TraceField, TEXT_HEADER_SIZE};

/// A volume description for the builder. Files are written inline-sorted
/// with every offset of a bin stored contiguously.
pub struct Volume {
    pub ilines: Vec<i32>,
    pub xlines: Vec<i32>,
    pub offsets: Vec<i32>,
    pub samples: u32,
    pub format: SampleFormat,
    pub interval_us: i32,
    pub ext_headers: i32,
}

impl Volume {
    pub fn small() -> Volume {
        Volume {
            ilines: (1..=5).collect(),
            xlines: (20..=24).collect(),
            offsets: vec![1],
            samples: 50,
            format: SampleFormat::IbmFloat4,
            interval_us: 4000,
            ext_headers: 0,
        }
    }

    /// The value of sample `k` in the trace at (inline, xline pos, offset pos).
    pub fn value(il: i32, xl_pos: usize, off_pos: usize, k: usize) -> f32 {
        il as f32 + 0.2 + 0.01 * xl_pos as f32 + 0.001 * off_pos as f32 + 1e-5 * k as f32
    }
}

/// A temp-file path that is unique per test name.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("segy_test_{name}.sgy"))
}

/// Writes a volume to `path` and returns (trace0, trace_bsize).
pub fn build(path: &Path, v: &Volume) -> (u64, u32) {
    let mut f = SegyFile::open(path, "w+b").expect("create fixture");

    let mut text = vec![b' '; TEXT_HEADER_SIZE];
    for (i, line) in text.chunks_mut(80).enumerate() {
        let tag = format!("C{:>2} fixture volume", i + 1);
        line[..tag.len()].copy_from_slice(tag.as_bytes());
    }
    f.write_text_header(0, &text).expect("text header");

    let mut bin = vec![0u8; segy::BINARY_HEADER_SIZE];
    field::set_bfield(&mut bin, BinField::Interval, v.interval_us).unwrap();
    field::set_bfield(&mut bin, BinField::Samples, v.samples as i32).unwrap();
    field::set_bfield(&mut bin, BinField::Format, v.format as i32).unwrap();
    field::set_bfield(&mut bin, BinField::ExtendedHeaders, v.ext_headers).unwrap();
    f.write_binary_header(&bin).expect("binary header");

    let trace0 = field::trace0(&bin).unwrap();
    let trace_bsize = field::trace_bsize(v.samples);

    let mut traceno = 0u32;
    for &il in &v.ilines {
        for (xl_pos, &xl) in v.xlines.iter().enumerate() {
            for (off_pos, &off) in v.offsets.iter().enumerate() {
                let mut header = vec![0u8; segy::TRACE_HEADER_SIZE];
                field::set_field(&mut header, TraceField::TraceSequenceLine, traceno as i32 + 1)
                    .unwrap();
                field::set_field(&mut header, TraceField::Inline3D, il).unwrap();
                field::set_field(&mut header, TraceField::Crossline3D, xl).unwrap();
                field::set_field(&mut header, TraceField::Offset, off).unwrap();
                field::set_field(&mut header, TraceField::SampleCount, v.samples as i32).unwrap();
                field::set_field(&mut header, TraceField::SampleInterval, v.interval_us).unwrap();
                f.write_trace_header(traceno, &header, trace0, trace_bsize)
                    .expect("trace header");

                let samples: Vec<f32> = (0..v.samples as usize)
                    .map(|k| Volume::value(il, xl_pos, off_pos, k))
                    .collect();
                f.write_samples(traceno, &samples, v.format, trace0, trace_bsize)
                    .expect("trace samples");

                traceno += 1;
            }
        }
    }

    f.close().expect("close fixture");
    (trace0, trace_bsize)
}

/// Builds the 25-trace fixture at a fresh temp path.
pub fn small(name: &str) -> (PathBuf, u64, u32) {
    let path = temp_path(name);
    let (trace0, trace_bsize) = build(&path, &Volume::small());
    (path, trace0, trace_bsize)
}

pub fn assert_close(actual: f32, expected: f32, tol: f32) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
