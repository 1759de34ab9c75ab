use crate::commands::{run_search, run_session, SearchArgs, SessionCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use escola_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EscolaFinder",
    about = "Search Brazilian schools by location, network and IDEB score",
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
    /// Run one school search and print the result cards
    Search(SearchArgs),
    /// Manage the identity searches run under
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
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
        Command::Search(args) => run_search(args).await,
        Command::Session { command } => run_session(command),
    }
}
