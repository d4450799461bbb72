#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Write;

use segy::{field, CubeGeometry, SegyFile, TraceField};

fuzz_target!(|data: &[u8]| {
    let mut tmp = tempfile::Builder::new()
        .suffix(".sgy")
        .tempfile()
        .unwrap();
    tmp.write_all(data).unwrap();

    let mut f = match SegyFile::open(tmp.path(), "rb") {
        Ok(f) => f,
        Err(_) => return,
    };

    let bin = match f.read_binary_header() {
        Ok(bin) => bin,
        Err(_) => return,
    };

    let _ = f.read_text_header();

    let (Ok(trace0), Ok(samples)) = (field::trace0(&bin), field::sample_count(&bin)) else {
        return;
    };
    let trace_bsize = field::trace_bsize(samples);

    // Arbitrary headers must produce errors, never panics.
    let _ = CubeGeometry::scan(
        &mut f,
        TraceField::Inline3D as i32,
        TraceField::Crossline3D as i32,
        trace0,
        trace_bsize,
    );
});
