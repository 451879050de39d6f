use crate::diagnose::{
    run_status, run_submission, run_system_check, CheckArgs, StatusArgs, SubmitArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use formcheck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Form Diagnostics",
    about = "Serve the form test endpoint or run form and system health checks",
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
    /// Run the full system test and print the report
    Check(CheckArgs),
    /// Show the status widget for one form
    Status(StatusArgs),
    /// Post a test submission to a form endpoint
    Submit(SubmitArgs),
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
        Command::Check(args) => run_system_check(args).await,
        Command::Status(args) => run_status(args).await,
        Command::Submit(args) => run_submission(args).await,
    }
}
