use crate::console::{run_allot, run_presets, run_rank, run_upload, AllotArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use intern_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Internship Matching",
    about = "Rank, filter and shortlist internship candidates from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the preset jobs known to the ranking service
    Presets,
    /// Check a candidate CSV and upload it to the ranking service
    Upload {
        /// Path to the candidate roster
        csv: PathBuf,
    },
    /// Rank candidates for one job and optionally shortlist them
    Rank(RankArgs),
    /// Run a batch allotment across preset jobs
    Allot(AllotArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured ranking service base URL
    #[arg(long)]
    pub(crate) ranking_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Presets => run_presets().await,
        Command::Upload { csv } => run_upload(csv).await,
        Command::Rank(args) => run_rank(args).await,
        Command::Allot(args) => run_allot(args).await,
    }
}
