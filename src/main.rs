// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use querysmith::utils::logging::{format_info, format_query, format_success};
use querysmith::{Config, Launcher, OpenAiClient, QueryComposer, SearchSession, SearchUrlBuilder, Shell};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "querysmith")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Turn a plain-language search intent into a Google operator query", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive prompt (default)
    Interactive,

    /// Compose a single query and open it
    Compose {
        /// What you are looking for
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the query and url without opening the browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print the search url for an already refined query
    Url {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    querysmith::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => cmd_interactive(&config).await?,
        Commands::Compose { text, no_open } => cmd_compose(&config, &text.join(" "), !no_open).await?,
        Commands::Url { query } => cmd_url(&config, &query.join(" "))?,
    }

    Ok(())
}

fn build_session(
    config: &Config,
) -> Result<(SearchSession, tokio::sync::mpsc::UnboundedReceiver<querysmith::SessionEvent>)> {
    let client = OpenAiClient::new(&config.model).context("Failed to set up the model client")?;
    info!("Using model {}", client.model());

    let composer = QueryComposer::new(Arc::new(client));
    let launcher = Launcher::from_config(&config.launcher).context("Invalid launcher settings")?;

    Ok(SearchSession::new(composer, launcher))
}

async fn cmd_interactive(config: &Config) -> Result<()> {
    let (session, events) = build_session(config)?;

    let input = BufReader::new(tokio::io::stdin());
    Shell::new(session, events, input, tokio::io::stdout())
        .run()
        .await
        .context("Terminal I/O failed")?;

    Ok(())
}

async fn cmd_compose(config: &Config, text: &str, open: bool) -> Result<()> {
    let (session, _events) = build_session(config)?;

    // Reported once, by anyhow on the way out of main.
    let outcome = session.compose_and_launch(text, open).await?;

    println!("{}", format_query(&outcome.result.refined_query));
    if outcome.opened {
        println!("{}", format_success(&format!("Opened {}", outcome.target.url())));
    } else {
        println!("{}", format_info(outcome.target.url().as_str()));
    }
    Ok(())
}

fn cmd_url(config: &Config, query: &str) -> Result<()> {
    let urls = SearchUrlBuilder::new(&config.launcher)?;
    let launcher_query = querysmith::Validator::require_text(query, "query")?;
    println!("{}", urls.resolve(&launcher_query).url());
    Ok(())
}
