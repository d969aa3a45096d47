use crate::commands::{run_create, run_home, run_token, CreateArgs, HomeArgs, TokenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kalyani_estate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Kalyani Estate",
    about = "Run the Kalyani Estate listing service and its client workflows",
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
    /// Print the home page feed fetched from a running listing API
    Home(HomeArgs),
    /// Upload images and create a listing from a JSON manifest
    Create(CreateArgs),
    /// Issue a development access token for a user
    Token(TokenArgs),
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
        Command::Home(args) => run_home(args).await,
        Command::Create(args) => run_create(args).await,
        Command::Token(args) => run_token(args),
    }
}
