use crate::report::{run_recommend, run_spreads, RecommendArgs, SpreadsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use spread_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Spread Advisor",
    about = "Recommend tarot spreads for a question and serve the recommendation API",
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
    /// Recommend a spread for a single question
    Recommend(RecommendArgs),
    /// List the spreads in the configured catalog
    Spreads(SpreadsArgs),
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
        Command::Recommend(args) => run_recommend(args),
        Command::Spreads(args) => run_spreads(args),
    }
}
