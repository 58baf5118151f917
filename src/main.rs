use anyhow::Context;
use chunkfold::engine::{worker, Coordinator, EngineConfig, RunReport};
use chunkfold::input;
use chunkfold::op::search::SearchOp;
use chunkfold::op::wordcount::{TokenRule, WordCountOp};
use chunkfold::op::OperationSpec;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Parallel text processing over a fixed group of worker processes
#[derive(Parser)]
#[command(name = "chunkfold")]
#[command(about = "Static-partition master/worker text processing", version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search files for a literal substring, reporting global line numbers
    Search {
        /// Substring to look for (case-sensitive, no regex)
        term: String,

        /// Input files, read in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Count word frequencies over the name field of comma-delimited records
    Count {
        /// Input files, read in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Keep only the K most frequent words
        #[arg(long)]
        top: Option<usize>,

        /// Treat digits as word characters in addition to letters
        #[arg(long)]
        alphanumeric: bool,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Run the worker role over stdin/stdout (spawned by the coordinator)
    #[command(hide = true)]
    Worker,
}

#[derive(Args)]
struct RunArgs {
    /// Number of workers including the coordinator (default: available
    /// parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-worker collection deadline in seconds (default: wait forever)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let workers = match self.workers {
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };
        let timeout = self.timeout_secs.map(Duration::from_secs);
        EngineConfig::from_current_exe(workers, timeout)
            .context("failed to build engine configuration")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Stdout is the worker's protocol channel and the coordinator's
    // result sink, so all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .init();

    match cli.command {
        Commands::Search { term, files, run } => {
            let lines = input::read_lines(&files).context("failed to read input files")?;
            debug!(lines = lines.len(), "input loaded");
            let operation = OperationSpec::Search(SearchOp { term });
            run_pipeline(&operation, &lines, &run).await
        }
        Commands::Count {
            files,
            top,
            alphanumeric,
            run,
        } => {
            let names = input::read_names(&files).context("failed to read input files")?;
            debug!(names = names.len(), "input loaded");
            let rule = if alphanumeric {
                TokenRule::Alphanumeric
            } else {
                TokenRule::Alphabetic
            };
            let operation = OperationSpec::WordCount(WordCountOp { rule, top_k: top });
            run_pipeline(&operation, &names, &run).await
        }
        Commands::Worker => worker::run().await.map_err(Into::into),
    }
}

async fn run_pipeline(
    operation: &OperationSpec,
    lines: &[String],
    run: &RunArgs,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(run.engine_config()?);
    let report = coordinator.run(operation, lines).await?;
    emit(&report, run.output.as_deref())?;

    if !report.missing_workers.is_empty() {
        warn!(
            missing = ?report.missing_workers,
            "result is incomplete: some workers missed the collection deadline"
        );
    }
    Ok(())
}

fn emit(report: &RunReport, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, &report.output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(report.output.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}
