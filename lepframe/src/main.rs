use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use lepframe::data::io::{read_events, write_json_lines};
use lepframe::error::Result;
use lepframe::pipeline::{process_events, AnalysisConfig};

/// Select leptons and build combined collections for every event of a JSON-lines file.
#[derive(Parser, Debug)]
#[command(name = "lepframe", version, about)]
struct Args {
    /// Input events, one JSON object per line
    #[arg(short, long)]
    input: PathBuf,

    /// Output summaries, one JSON object per line
    #[arg(short, long)]
    output: PathBuf,

    /// JSON analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the loose hybrid-isolation working points
    #[arg(long)]
    loose: bool,

    /// Number of worker threads, 0 for one per core
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };
    if args.loose {
        config = config.with_loose_selections();
    }

    let events = read_events(&args.input)?;
    info!("read {} events from {}", events.len(), args.input.display());

    let summaries = process_events(&events, &config, args.threads)?;
    write_json_lines(&args.output, &summaries)?;
    info!("wrote {} summaries to {}", summaries.len(), args.output.display());

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
