use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::watch;

use nft_minter::blockchain::detect_provider;
use nft_minter::config::{load_config, MinterConfig};
use nft_minter::minting::MintStatus;
use nft_minter::observability::{logging, metrics};
use nft_minter::{ConnectOutcome, MintSession};

#[derive(Parser)]
#[command(name = "nft-mint")]
#[command(about = "Connect a wallet and mint an NFT", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wallet JSON-RPC endpoint, overriding the configured one.
    #[arg(short, long)]
    wallet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the already-authorized account, without prompting
    Status,
    /// Ask the wallet for an account and move it to the target network
    Connect,
    /// Move the wallet to the target network
    Network,
    /// Connect if needed, then mint to the connected account
    Mint,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MinterConfig::default(),
    };
    if let Some(wallet) = cli.wallet {
        config.wallet.endpoint = Some(wallet);
    }

    logging::init_logging(&config.observability)?;
    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    tracing::info!(
        network = %config.network.name,
        chain_id = %config.network.chain_id,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    let provider = detect_provider(&config.wallet).await;
    let mut session = MintSession::new(&config, provider);

    match cli.command {
        Commands::Status => match session.on_load().await {
            Some(account) => println!("Connected: {account}"),
            None => println!("Not connected to {}", config.network.name),
        },
        Commands::Connect => print_connect(session.connect().await),
        Commands::Network => {
            if session.switch_network().await {
                println!("Wallet is on {}", config.network.name);
            } else {
                println!("Wallet is not on {}", config.network.name);
            }
        }
        Commands::Mint => {
            if session.on_load().await.is_none() {
                print_connect(session.connect().await);
            }
            if session.current_account().is_none() {
                return Ok(());
            }

            let progress = tokio::spawn(report_progress(session.watch_mint_status()));
            let receipt = session.mint().await;
            progress.abort();

            match receipt {
                Some(receipt) => {
                    println!("Mined in block {}", receipt.block_number);
                    println!("See transaction: {}", receipt.explorer_link);
                }
                None => match &*session.watch_mint_status().borrow() {
                    MintStatus::Failed(reason) => println!("Mint failed: {reason}"),
                    _ => println!("Mint did not complete"),
                },
            }
        }
    }

    Ok(())
}

fn print_connect(outcome: ConnectOutcome) {
    match outcome {
        ConnectOutcome::Connected(account) => println!("Connected: {account}"),
        ConnectOutcome::InstallWallet => {
            if let Some(notice) = outcome.notice() {
                println!("{notice}");
            }
        }
        ConnectOutcome::NotConnected => println!("Wallet not connected"),
    }
}

async fn report_progress(mut status: watch::Receiver<MintStatus>) {
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        match current {
            MintStatus::AwaitingSignature => println!("Confirm the transaction in your wallet"),
            MintStatus::Mining { tx_hash } => println!("Mining {tx_hash}... please wait"),
            _ => {}
        }
    }
}
