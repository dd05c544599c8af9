use crate::offline::{run_estimate, run_lenders, EstimateArgs, LendersArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loandoc_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loandoc",
    about = "Estimate loan eligibility across lenders for foreign workers",
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
    /// Run one estimate request from a JSON file and print the response
    Estimate(EstimateArgs),
    /// Print the lender catalog with resolved ranks
    Lenders(LendersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Lenders(args) => run_lenders(args),
    }
}
