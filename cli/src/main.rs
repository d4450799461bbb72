use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Row, Table};

use segy::{field, CubeGeometry, SegyFile, Sorting};

/// Inspect a SEG-Y file: cube geometry, sample format, line indices.
#[derive(Parser)]
#[command(name = "segyinspect", version, about)]
struct Cli {
    /// Path to the SEG-Y file
    file: PathBuf,

    /// Trace-header byte offset of the inline number
    #[arg(default_value_t = 189)]
    inline_byte: i32,

    /// Trace-header byte offset of the crossline number
    #[arg(default_value_t = 193)]
    crossline_byte: i32,

    /// Memory-map the file instead of using buffered reads
    #[arg(long)]
    mmap: bool,
}

fn inspect(cli: &Cli) -> Result<(), segy::Error> {
    let start = Instant::now();

    let mut f = SegyFile::open(&cli.file, "rb")?;
    if cli.mmap {
        f.mmap()?;
    }

    let bin = f.read_binary_header()?;
    let format = field::format(&bin)?;
    let samples = field::sample_count(&bin)?;
    let trace0 = field::trace0(&bin)?;
    let trace_bsize = field::trace_bsize(samples);

    let cube = CubeGeometry::scan(&mut f, cli.inline_byte, cli.crossline_byte, trace0, trace_bsize)?;

    let fastest = match cube.sorting {
        Sorting::Inline => "INLINE",
        Sorting::Crossline => "CROSSLINE",
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(Row::from(vec![
        Cell::new("Crosslines"),
        Cell::new(cube.crossline_count.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Inlines"),
        Cell::new(cube.inline_count.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Offsets"),
        Cell::new(cube.offset_count.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Traces"),
        Cell::new(cube.trace_count.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Samples per trace"),
        Cell::new(samples.to_string()),
    ]));
    table.add_row(Row::from(vec![
        Cell::new("Sample format"),
        Cell::new(format.name()),
    ]));
    table.add_row(Row::from(vec![Cell::new("Fastest direction"), Cell::new(fastest)]));
    println!("{table}");

    println!();
    println!("Crossline indexes:");
    println!("{}", join(&cube.crossline_indices));
    println!();
    println!("Inline indexes:");
    println!("{}", join(&cube.inline_indices));
    println!();
    println!("Inspection took: {:.2?}", start.elapsed());

    f.close()
}

fn join(indices: &[i32]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = inspect(&cli) {
        eprintln!("{}: {err}", cli.file.display());
        process::exit(err.code());
    }
}
