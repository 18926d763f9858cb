#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{error, fs, path::PathBuf, process};

mod file;
use file::{DetectionsFile, JsonLinesStore};

use isbnproc::{Pipeline, UploadEvent};

use clap::Parser;
use eyre::{eyre, Context};
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<(), Box<dyn error::Error>> {
    let Cli {
        event,
        detections,
        table,
        out_dir,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let notification = fs::read_to_string(&event)
        .wrap_err_with(|| eyre!("Cannot read the event file '{}'", event.display()))?;
    let event = UploadEvent::from_notification(&notification)?;
    trace!(
        "Upload of s3://{}/{} at {}",
        event.bucket_name,
        event.object_key,
        event.event_time
    );

    let pipeline = Pipeline::new(
        DetectionsFile::new(detections),
        JsonLinesStore::new(out_dir),
        table,
    );

    // failures are logged by the pipeline and never escape it
    pipeline.handle(&event);
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<(), Box<dyn error::Error>> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "isbnproc")]
#[clap(about = "Process an uploaded ISBN image into a book record using local stand-ins for OCR and storage")]
#[clap(version, author)]
struct Cli {
    /// Path to an object-created notification (JSON) describing the upload
    #[clap(parse(from_os_str))]
    event: PathBuf,

    /// File holding the text lines detected in the uploaded image, one per line
    #[clap(short, long, parse(from_os_str))]
    detections: PathBuf,

    /// Table the record is loaded into
    #[clap(short, long, env = "TABLE_NAME")]
    table: String,

    /// Directory holding the `<table>.jsonl` files
    #[clap(short, long, parse(from_os_str), default_value = ".")]
    out_dir: PathBuf,

    /// How chatty the program is when processing the upload
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only errors are printed to stderr.
    #[clap(short, long)]
    quiet: bool,
}
