//! Vector3D Lifecycle Demonstration
//!
//! Runs the fixed demonstration script, printing narration and one trace line
//! per lifecycle event (construction, copy, move, destruction) to stdout.
//!
//! Usage:
//!   cargo run --bin lifecycle_demo -- [--section N]... [--format text|json]

use std::io;

use clap::Parser;
use lifetrace::demo::{self, DemoConfig, Section};
use lifetrace::trace::{TraceFormat, Tracer};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Vector3D Lifecycle Demonstration
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Demonstrates construction, copy, move and destruction of a 3D vector",
    long_about = None
)]
struct Args {
    /// Run only this section (1-6); may be repeated
    #[arg(short, long = "section", value_name = "N")]
    sections: Vec<Section>,

    /// How lifecycle events are printed (with `json`, narration goes to stderr)
    #[arg(short, long, value_enum, default_value_t = TraceFormat::Text)]
    format: TraceFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tracer = Tracer::for_format(args.format);
    let config = DemoConfig::only(args.sections);

    // Keep stdout pure JSON lines; narration moves to stderr
    match args.format {
        TraceFormat::Text => demo::run(&tracer, &mut io::stdout(), &config)?,
        TraceFormat::Json => demo::run(&tracer, &mut io::stderr(), &config)?,
    }

    Ok(())
}
