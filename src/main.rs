//! A3S Suggest CLI - Search suggestion aggregator command line interface.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use a3s_suggest::{
    parse_quick_search,
    providers::{self, DEFAULT_PROVIDER_IDS},
    Aggregator, MergedSuggestion, SessionConfig, SessionPhase, SuggestMode, SuggestionClient,
    SuggestionProvider, SuggestionSession, SuggestionSnapshot,
};

/// A3S Suggest - Multi-engine search suggestion CLI
#[derive(Parser)]
#[command(name = "a3s-suggest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch merged suggestions for a query
    Suggest(SuggestArgs),

    /// List available suggestion providers
    Providers,

    /// Parse a quick-search input ("s keyword")
    Quick {
        /// Raw search box input
        input: String,
    },

    /// Read queries from stdin, one per line, through a debounced session
    Watch(WatchArgs),
}

#[derive(Parser)]
struct SuggestArgs {
    /// Partial query
    query: String,

    /// Providers to use (comma-separated)
    /// Available: baidu, google, bing, 360, taobao, sogou
    #[arg(short, long, value_delimiter = ',')]
    providers: Option<Vec<String>>,

    /// Per-provider timeout in seconds
    #[arg(short, long, default_value = "5")]
    timeout: u64,

    /// Maximum number of merged suggestions to display
    #[arg(short, long, default_value = "8")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct WatchArgs {
    /// Providers to use (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    providers: Option<Vec<String>>,

    /// Query only this provider
    #[arg(short, long)]
    single: Option<String>,

    /// Debounce delay in milliseconds
    #[arg(short, long, default_value = "300")]
    debounce: u64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Suggest(args) => run_suggest(args).await,
        Commands::Providers => list_providers(),
        Commands::Quick { input } => run_quick(&input),
        Commands::Watch(args) => run_watch(args).await,
    }
}

fn list_providers() -> Result<()> {
    println!("Available suggestion providers:\n");
    println!("  Default:");
    println!("    baidu    - Baidu (百度)");
    println!("    google   - Google (谷歌)");
    println!("    bing     - Bing (必应)");
    println!("    360      - 360 Search (360搜索)");
    println!("    taobao   - Taobao (淘宝)");
    println!();
    println!("  Optional:");
    println!("    sogou    - Sogou (搜狗)");
    println!();
    println!("Usage: a3s-suggest suggest \"query\" -p baidu,google");
    Ok(())
}

fn build_client(selection: Option<Vec<String>>, timeout: Option<u64>) -> Result<SuggestionClient> {
    let ids = selection
        .unwrap_or_else(|| DEFAULT_PROVIDER_IDS.iter().map(|s| s.to_string()).collect());

    let mut client = SuggestionClient::new();
    for id in &ids {
        match providers::provider_by_id(id) {
            Some(provider) => client.add_shared(with_timeout(provider, timeout)),
            None => eprintln!("Warning: Unknown provider '{}', skipping", id),
        }
    }

    if client.providers().is_empty() {
        anyhow::bail!("No valid providers specified");
    }
    Ok(client)
}

/// Rebuilds a provider with a different timeout, keeping everything else.
fn with_timeout(
    provider: Arc<dyn SuggestionProvider>,
    timeout: Option<u64>,
) -> Arc<dyn SuggestionProvider> {
    let Some(secs) = timeout else {
        return provider;
    };
    let mut config = provider.config().clone();
    config.timeout = secs;
    match config.id.as_str() {
        "baidu" => Arc::new(providers::Baidu::new().with_config(config)),
        "google" => Arc::new(providers::Google::new().with_config(config)),
        "bing" => Arc::new(providers::Bing::new().with_config(config)),
        "so360" => Arc::new(providers::So360::new().with_config(config)),
        "taobao" => Arc::new(providers::Taobao::new().with_config(config)),
        "sogou" => Arc::new(providers::Sogou::new().with_config(config)),
        _ => provider,
    }
}

async fn run_suggest(args: SuggestArgs) -> Result<()> {
    let client = build_client(args.providers, Some(args.timeout))?;
    let config = SessionConfig {
        max_merged: args.limit,
        ..SessionConfig::default()
    };
    let session = SuggestionSession::with_config(Aggregator::with_client(client), config);

    let snapshot = session.evaluate(&args.query).await;
    print_snapshot(&session, &snapshot, args.format)
}

fn run_quick(input: &str) -> Result<()> {
    let quick = parse_quick_search(input);
    println!("{}", serde_json::to_string_pretty(&quick)?);
    Ok(())
}

async fn run_watch(args: WatchArgs) -> Result<()> {
    let client = build_client(args.providers, None)?;
    let aggregator = Aggregator::with_client(client);
    let config = SessionConfig {
        debounce_ms: args.debounce,
        ..SessionConfig::default()
    };

    let session = SuggestionSession::with_config(aggregator, config);
    if let Some(id) = args.single {
        let id = providers::provider_by_id(&id)
            .map(|p| p.id().to_string())
            .unwrap_or(id);
        session.set_mode(SuggestMode::Single(id)).await;
    }

    // Edits arriving within the debounce window coalesce into one fetch;
    // only settled snapshots are printed.
    let mut snapshots = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut eof = false;

    loop {
        tokio::select! {
            line = lines.next_line(), if !eof => match line? {
                Some(line) => session.on_query_change(&line).await,
                None => {
                    eof = true;
                    session.flush().await;
                }
            },
            changed = snapshots.changed() => {
                changed?;
                let snapshot = snapshots.borrow_and_update().clone();
                if !snapshot.is_loading {
                    print_snapshot(&session, &snapshot, args.format)?;
                }
            }
        }

        if eof && session.phase().await == SessionPhase::Idle && !snapshots.has_changed()? {
            break;
        }
    }

    Ok(())
}

fn print_snapshot(
    session: &SuggestionSession,
    snapshot: &SuggestionSnapshot,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
        OutputFormat::Text => {
            println!("> {}", snapshot.query);
            if let Some(error) = &snapshot.error {
                println!("  ! {}", error);
            }
            if snapshot.merged_suggestions.is_empty() {
                for suggestion in &snapshot.suggestions {
                    println!("  {}", suggestion.text);
                }
            } else {
                print_merged(session.aggregator(), &snapshot.merged_suggestions);
            }
            println!();
        }
    }
    Ok(())
}

fn print_merged(aggregator: &Aggregator, merged: &[MergedSuggestion]) {
    for (i, suggestion) in merged.iter().enumerate() {
        let sources: Vec<&str> = suggestion
            .sources
            .iter()
            .map(|id| aggregator.provider_name(id).unwrap_or(id.as_str()))
            .collect();
        let marker = if suggestion.is_quick_search { " [quick]" } else { "" };
        println!(
            "{}. {}{}  ({})",
            i + 1,
            suggestion.text,
            marker,
            sources.join(", ")
        );
    }
}
