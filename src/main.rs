use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use room_rank::config::QueryConfig;
use room_rank::scoring::ScoreBreakdown;
use room_rank::ziroom::Listing;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_NO_LISTINGS: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl, rank and export listings (default if no subcommand)
    Run,
    /// Open a listing in the browser by its rank in the last report
    Open {
        /// Rank of the listing to open (1-based, as exported)
        index: usize,
    },
    /// Write a commented starter config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "room-rank")]
#[command(about = "Apartment hunting CLI: crawl listings, rank by commute, size and rent", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/room-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Search query URL (repeatable; overrides configured queries)
    #[arg(short, long)]
    query: Vec<String>,

    /// Commute ceiling in minutes (overrides config)
    #[arg(long)]
    ceiling: Option<u32>,

    /// Output CSV path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Routing service API key (overrides config and stored key)
    #[arg(long)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);
    let start_time = Instant::now();

    if let Commands::Init = command {
        match room_rank::config::write_starter_config(cli.config.as_deref().map(PathBuf::from)) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                println!("Edit the queries, then run `room-rank`.");
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Init error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut config = match room_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // CLI overrides
    if !cli.query.is_empty() {
        config.queries = cli
            .query
            .iter()
            .map(|url| QueryConfig {
                name: None,
                url: url.clone(),
            })
            .collect();
    }
    if let Some(ceiling) = cli.ceiling {
        config.commute_ceiling_minutes = ceiling;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }

    if let Commands::Open { index } = command {
        if index < 1 {
            eprintln!("Invalid index {}. Must be 1 or greater.", index);
            std::process::exit(EXIT_CONFIG);
        }
        match room_rank::output::detail_url_at(&config.output, index) {
            Ok(url) => {
                if let Err(e) = room_rank::browser::open_listing(&url) {
                    eprintln!("Failed to open browser: {}", e);
                    std::process::exit(EXIT_NETWORK);
                }
                println!("Opening listing {} in browser: {}", index, url);
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Validate scoring config at startup
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = room_rank::scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Check if any queries are configured
    if config.queries.is_empty() {
        eprintln!("No queries configured.");
        eprintln!("Run `room-rank init` and edit ~/.config/room-rank/config.yaml,");
        eprintln!("or pass one directly with --query <url>.");
        std::process::exit(EXIT_CONFIG);
    }

    let timeout = match config.timeout() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Resolve the routing API key (prompts on first run)
    let api_key = match room_rank::credentials::setup_api_key_if_missing(
        cli.api_key.as_deref().or(config.routing.api_key.as_deref()),
    ) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    if cli.verbose {
        eprintln!("Loaded {} queries", config.queries.len());
        for (i, query) in config.queries.iter().enumerate() {
            eprintln!(
                "  Query {}: {} ({})",
                i + 1,
                query.name.as_deref().unwrap_or("(unnamed)"),
                query.url
            );
        }
        eprintln!("Commute ceiling: {} min", config.commute_ceiling_minutes);
        eprintln!("Destination: {}", config.routing.destination);
    }

    let client = match room_rank::ziroom::create_client(timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };
    let routing = room_rank::routing::RoutingClient::new(client.clone(), &config.routing, api_key);

    // Crawl both queries; scoring must wait until every page is done
    let mut listings =
        match room_rank::fetch::collect_listings(&client, &routing, &config, cli.verbose).await {
            Ok(l) => l,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_NETWORK);
            }
        };

    if listings.is_empty() {
        eprintln!(
            "No listings under the {} minute ceiling; nothing to rank.",
            config.commute_ceiling_minutes
        );
        std::process::exit(EXIT_NO_LISTINGS);
    }

    if cli.verbose {
        eprintln!(
            "Accepted {} listing(s) in {:?}",
            listings.len(),
            start_time.elapsed()
        );
    }

    // Score against set-wide bounds, then rank best-first
    let breakdowns = match room_rank::scoring::score_listings(&mut listings, &effective_scoring) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_NO_LISTINGS);
        }
    };
    let mut scored: Vec<(Listing, ScoreBreakdown)> =
        listings.into_iter().zip(breakdowns).collect();
    room_rank::scoring::rank(&mut scored);

    if let Err(e) = room_rank::output::write_csv(scored.iter().map(|(l, _)| l), &config.output) {
        eprintln!("Export error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    // Output results
    let use_colors = room_rank::output::should_use_colors();

    if cli.verbose {
        // Verbose mode: detailed output with factor values
        for (listing, breakdown) in &scored {
            println!(
                "{}",
                room_rank::output::format_listing_detail(listing, use_colors)
            );
            println!(
                "  Factors: {}",
                room_rank::output::format_breakdown(breakdown)
            );
            println!();
        }
    } else {
        // Normal mode: ranked table
        println!(
            "{}",
            room_rank::output::format_ranked_table(&scored, use_colors)
        );
    }

    println!(
        "Wrote {} listing(s) to {}",
        scored.len(),
        config.output.display()
    );
    if cli.verbose {
        eprintln!("Total time: {:?}", start_time.elapsed());
    }
    std::process::exit(EXIT_SUCCESS);
}
