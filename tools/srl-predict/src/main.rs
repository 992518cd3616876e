//! SRL Batch Predictor
//!
//! Runs a semantic-role-labeling model over a file of sentences, one per
//! line, and writes one JSON prediction per sentence.

mod archive;
mod error;
mod predictor;
mod runner;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::archive::Archive;
use crate::predictor::CommandPredictor;
use crate::runner::Sink;

/// CLI arguments
#[derive(Parser)]
#[command(name = "srl-predict")]
#[command(about = "Run a semantic-role-labeling model over newline-delimited sentences")]
#[command(version)]
struct Cli {
    /// The archived model to make predictions with
    archive_file: PathBuf,

    /// Path to input file
    input_file: PathBuf,

    /// Path to output file; predictions are printed when omitted
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// The batch size to use for processing
    #[arg(long, default_value_t = 1)]
    batch_size: usize,

    /// Id of GPU to use (-1 for CPU)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    cuda_device: i32,

    /// External inference program speaking JSON lines on stdin/stdout
    #[arg(long, env = "SRL_PREDICTOR_COMMAND")]
    predictor_command: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    let archive = Archive::load(&cli.archive_file)
        .with_context(|| format!("failed to load archive {}", cli.archive_file.display()))?;
    archive.ensure_srl()?;

    let predictor = CommandPredictor::new(&cli.predictor_command, archive.path())?
        .with_cuda_device(cli.cuda_device);
    info!(
        archive = %predictor.archive().display(),
        cuda_device = cli.cuda_device,
        "predictor ready"
    );

    let input = File::open(&cli.input_file)
        .with_context(|| format!("failed to open {}", cli.input_file.display()))?;
    let input = BufReader::new(input);

    let predicted = match &cli.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = Sink::File(BufWriter::new(file));
            let n = runner::run(&predictor, input, &mut sink, cli.batch_size)?;
            sink.into_inner().flush()?;
            n
        }
        None => {
            let mut sink = Sink::Console(io::stdout().lock());
            let n = runner::run(&predictor, input, &mut sink, cli.batch_size)?;
            sink.into_inner().flush()?;
            n
        }
    };

    info!(sentences = predicted, "done");
    Ok(())
}
