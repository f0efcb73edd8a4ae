//! Billboard CLI.
//!
//! Reads the feed, watches for new messages, and posts messages either
//! fee-sponsored or self-paid.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use billboard::chain::{Address, ChainClient};
use billboard::config;
use billboard::feed::{display, FeedService};
use billboard::indexer::{FeedWatcher, IndexerClient};
use billboard::posting::{ContentPolicy, PostPipeline, RateLimiter};
use billboard::sponsor::SponsorClient;
use billboard::wallet::{LocalKeyWallet, WalletSession, ACCOUNT_ADDRESS_ENV_VAR};

#[derive(Parser)]
#[command(name = "billboard")]
#[command(about = "Client for the on-chain message billboard", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network selector override (testnet, mainnet, local).
    #[arg(short, long)]
    network: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the most recent messages
    Feed {
        /// Maximum number of messages to show
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show the total message count
    Count,
    /// Show all messages by one author
    Author { address: String },
    /// Poll for new messages and print them as they arrive
    Watch {
        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Post a message to the billboard
    Post {
        message: String,
        /// Pay fees yourself even when sponsorship is available
        #[arg(long)]
        no_sponsor: bool,
    },
    /// Show the balance of an address (defaults to the wallet address)
    Balance { address: Option<String> },
    /// Show connectivity and sponsorship status
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_default()?,
    };
    if let Some(network) = cli.network {
        config.network = network;
    }

    billboard::observability::init_logging(&config.observability);
    tracing::debug!(network = %config.network, "configuration loaded");

    let chain = ChainClient::new(config.chain.clone())?;
    let indexer = IndexerClient::new(config.indexer.clone());

    match cli.command {
        Commands::Feed { limit } => {
            let feed = FeedService::new(indexer, chain)?;
            let limit = limit.unwrap_or(config.indexer.default_limit);
            for message in feed.messages(limit).await {
                print_message(&message);
            }
        }
        Commands::Count => {
            let feed = FeedService::new(indexer, chain)?;
            println!("{}", feed.count().await);
        }
        Commands::Author { address } => {
            let author = Address::parse(&address)?;
            let feed = FeedService::new(indexer, chain)?;
            for message in feed.messages_by_author(&author).await {
                print_message(&message);
            }
        }
        Commands::Watch { interval } => {
            let mut indexer_config = config.indexer.clone();
            if let Some(ms) = interval {
                indexer_config.poll_interval_ms = ms;
            }
            let watcher_client = IndexerClient::new(indexer_config);

            // Start after the newest message already on the board.
            let feed = FeedService::new(indexer, chain)?;
            let last_seen = feed
                .messages(1)
                .await
                .first()
                .map(|m| m.timestamp_usecs)
                .unwrap_or(0);

            let mut rx = FeedWatcher::new(watcher_client, last_seen).spawn();
            println!("watching for new messages (ctrl-c to stop)");
            while let Some(batch) = rx.recv().await {
                for row in batch {
                    print_message(&billboard::feed::Message::from(row));
                }
            }
        }
        Commands::Post {
            message,
            no_sponsor,
        } => {
            let wallet = LocalKeyWallet::from_env(wallet_env_address()?)?;
            let mut session = WalletSession::new(Box::new(wallet), config.wallet.clone());
            session.connect(&chain).await?;

            let sponsor = SponsorClient::new(config.sponsor.clone());
            let pipeline = PostPipeline::new(
                chain,
                sponsor,
                ContentPolicy::new(&config.posting),
                RateLimiter::new(&config.rate_limit),
                &config.posting,
            )?;

            match pipeline
                .post(session.adapter(), &message, !no_sponsor)
                .await
            {
                Ok(receipt) => {
                    println!(
                        "posted: {} ({})",
                        receipt.hash,
                        if receipt.sponsored {
                            "sponsored"
                        } else {
                            "self-paid"
                        }
                    );
                }
                Err(e) => {
                    tracing::debug!(error = %e, "post failed");
                    return Err(e.user_message().into());
                }
            }
        }
        Commands::Balance { address } => {
            let target = match address {
                Some(s) => Address::parse(&s)?,
                None => wallet_env_address()?,
            };
            let balance = chain.account_balance(&target).await?;
            let coins = ChainClient::to_display_coins(balance);
            let percent = billboard::wallet::gauge_percent(balance, &config.wallet);
            println!(
                "{}: {:.4} coins ({:.0}% of gauge)",
                display::shorten_address(target.as_str()),
                coins,
                percent
            );
        }
        Commands::Status => {
            let sponsor = SponsorClient::new(config.sponsor.clone());
            let node = if chain.is_healthy().await {
                "reachable"
            } else {
                "unreachable"
            };
            let indexer_status = match indexer.message_count().await {
                Ok(count) => format!("reachable ({} messages)", count),
                Err(_) => "unreachable".to_string(),
            };
            println!("network:  {}", config.network);
            println!("node:     {}", node);
            println!("indexer:  {}", indexer_status);
            println!("sponsor:  {}", sponsor.status().message);
        }
    }

    Ok(())
}

fn print_message(message: &billboard::feed::Message) {
    println!(
        "[{}] {} {}",
        display::format_timestamp(message.timestamp_usecs),
        display::shorten_address(&message.author),
        message.content
    );
}

/// Wallet account address from the environment.
fn wallet_env_address() -> Result<Address, Box<dyn std::error::Error>> {
    let raw = std::env::var(ACCOUNT_ADDRESS_ENV_VAR)
        .map_err(|_| format!("{} not set", ACCOUNT_ADDRESS_ENV_VAR))?;
    Ok(Address::parse(&raw)?)
}
