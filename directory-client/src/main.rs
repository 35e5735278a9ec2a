use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directory_core::{QueryDescriptor, SortKey, SortOrder};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;

use directory_client::api::{ApiClient, DirectoryApi, DEFAULT_API_URL};
use directory_client::commands::{parse_command, Action, ParseResult, HELP};
use directory_client::render;
use directory_client::state_machine::{Event, QuerySession};

/// Companies directory: query the directory API from the terminal
#[derive(Parser, Debug)]
#[command(name = "directory")]
#[command(about = "Browse the companies directory", long_about = None)]
struct Cli {
    /// Base URL of the directory API
    #[arg(long, env = "DIRECTORY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "DIRECTORY_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Log requests and state transitions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the server is up
    Health,
    /// Print aggregate statistics
    Stats,
    /// List the available industries and locations
    Filters,
    /// Fetch and print one page of companies
    List(ListArgs),
    /// Interactive browser with live search, filters and paging
    Browse,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u64,

    /// Companies per page
    #[arg(long, default_value_t = 10)]
    limit: u64,

    /// Case-insensitive match on name, description or location
    #[arg(long, default_value = "")]
    search: String,

    /// Exact industry name
    #[arg(long, default_value = "")]
    industry: String,

    /// Substring of the location
    #[arg(long, default_value = "")]
    location: String,

    #[arg(long, default_value = "name", value_parser = ["name", "employees", "founded", "industry", "description", "location", "ceo", "revenue"])]
    sort_by: String,

    #[arg(long, default_value = "asc", value_parser = ["asc", "desc"])]
    sort_order: String,

    #[arg(long, default_value = "table", value_parser = ["table", "card"])]
    view: String,
}

impl ListArgs {
    fn to_query(&self) -> Result<QueryDescriptor> {
        let sort_by: SortKey = self.sort_by.parse()?;
        Ok(QueryDescriptor::default()
            .with_page(self.page)
            .with_limit(self.limit)
            .with_search(self.search.as_str())
            .with_industry(self.industry.as_str())
            .with_location(self.location.as_str())
            .with_sort(sort_by, SortOrder::parse_lenient(&self.sort_order)))
    }
}

async fn run_health(api: &dyn DirectoryApi) -> Result<()> {
    let health = api.health().await.context("Health check failed")?;
    println!("{}: {}", health.status, health.message);
    if let Some(version) = health.version {
        println!("Version: {}", version);
    }
    if let Some(timestamp) = health.timestamp {
        println!("Timestamp: {}", timestamp);
    }
    Ok(())
}

async fn run_stats(api: &dyn DirectoryApi) -> Result<()> {
    let stats = api.fetch_stats().await.context("Failed to fetch statistics")?;
    println!("{}", render::render_stats(&stats));
    Ok(())
}

async fn run_filters(api: &dyn DirectoryApi) -> Result<()> {
    let facets = api.fetch_facets().await.context("Failed to fetch filters")?;
    println!("{}", render::render_facets(&facets));
    Ok(())
}

async fn run_list(api: &dyn DirectoryApi, args: ListArgs) -> Result<()> {
    let query = args.to_query()?;
    let page = api
        .fetch_companies(&query)
        .await
        .context("Failed to fetch companies")?;

    match args.view.as_str() {
        "card" => print!("{}", render::render_cards(&page.data)),
        _ => print!("{}", render::render_table(&page.data)),
    }
    if !page.data.is_empty() {
        println!("{}", render::render_pagination(&page.pagination));
    }
    Ok(())
}

async fn run_browse(api: Arc<dyn DirectoryApi>) -> Result<()> {
    let mut session = QuerySession::new(api);
    session
        .dispatch_and_settle(Event::Mounted, |state| print!("{}", render::render_state(state)))
        .await;
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match parse_command(&line) {
            ParseResult::Empty => continue,
            ParseResult::UnrecognizedCommand { attempted } => {
                eprintln!("Unknown command '{}'. Type 'help' for commands.", attempted);
                continue;
            }
            ParseResult::InvalidArgument { command, message } => {
                eprintln!("{}: {}", command, message);
                continue;
            }
            ParseResult::Command(command) => command,
        };

        match command.into_action(session.state()) {
            Action::Quit => break,
            Action::Help => println!("{}", HELP),
            Action::Notice(message) => println!("{}", message),
            Action::ShowFilters => {
                let facets = &session.state().facets.data;
                println!("{}", render::render_facets(facets));
            }
            Action::Dispatch(event) => {
                session
                    .dispatch_and_settle(event, |state| print!("{}", render::render_state(state)))
                    .await;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let client = ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to create HTTP client")?;
    let api: Arc<dyn DirectoryApi> = Arc::new(client);

    match cli.command {
        Commands::Health => run_health(api.as_ref()).await,
        Commands::Stats => run_stats(api.as_ref()).await,
        Commands::Filters => run_filters(api.as_ref()).await,
        Commands::List(args) => run_list(api.as_ref(), args).await,
        Commands::Browse => run_browse(api).await,
    }
}
