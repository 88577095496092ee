use std::{io, path::PathBuf, process};

use chainset::{
    console::{ConsoleError, ConsoleOptions, OptionsError, Session, MAX_KEY_LEN},
    table::{HashTable, TableError, DEFAULT_BUCKETS},
};
use clap::Parser;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive chained hash table of strings")]
struct Args {
    /// Number of buckets, fixed for the life of the table
    #[arg(short, long, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// Longest key in bytes read from the console; longer words are split
    #[arg(short = 'l', long, default_value_t = MAX_KEY_LEN)]
    max_key_len: usize,

    #[arg(long, default_value = "exit")]
    load_sentinel: String,

    #[arg(long, default_value = "done")]
    query_sentinel: String,

    #[arg(long, default_value = "print")]
    dump_command: String,

    /// Verbosity of diagnostics written to stderr
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    /// Also write a Chrome trace of the session to this file
    #[arg(long)]
    trace_file: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("could not build table: {0}")]
    Table(#[from] TableError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
}

fn main() {
    let args = Args::parse();
    let guard = init_tracing(args.log_level, args.trace_file.as_ref());
    let result = run(args);
    // The chrome trace is only written out when the guard drops.
    drop(guard);
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn init_tracing(level: Level, trace_file: Option<&PathBuf>) -> Option<tracing_chrome::FlushGuard> {
    let (chrome, guard) = match trace_file {
        Some(path) => {
            let (layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(fmt::layer().with_writer(io::stderr))
        .with(chrome)
        .init();
    guard
}

fn run(args: Args) -> Result<(), AppError> {
    let options = ConsoleOptions {
        load_sentinel: args.load_sentinel,
        query_sentinel: args.query_sentinel,
        dump_command: args.dump_command,
        max_key_len: args.max_key_len,
    };
    options.validate()?;
    let mut table = HashTable::with_buckets(args.buckets)?;
    tracing::info!(buckets = table.bucket_count(), "table ready");

    let summary = Session::new(&mut table, io::stdout().lock(), &options).run(io::stdin().lock())?;
    tracing::info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        errors = summary.errors,
        found = summary.found,
        missed = summary.missed,
        stored = table.len(),
        "session finished"
    );
    Ok(())
}
