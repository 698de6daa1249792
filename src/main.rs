// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use card_wallet::logging::{self, LogTarget};
use card_wallet::{AccountForm, SubmissionOutcome, WalletConfig};

#[derive(Parser)]
#[command(name = "card-wallet", version, about = "Register bank cards and track their balances")]
struct Cli {
    /// JSON config file (falls back to $CARD_WALLET_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs here while the TUI is running
    #[arg(long, env = "CARD_WALLET_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Format and validate card details without opening the UI
    Check {
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        expiration_date: String,
        #[arg(long)]
        cvv: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the banks the entry form offers
    Banks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check {
            card_number,
            expiration_date,
            cvv,
            json,
        }) => {
            logging::init(LogTarget::Stderr)?;
            let config = load_config(cli.config.as_deref())?;
            run_check(&config, &card_number, &expiration_date, &cvv, json)
        }
        Some(Command::Banks) => {
            logging::init(LogTarget::Stderr)?;
            let config = load_config(cli.config.as_deref())?;
            for name in config.banks.names() {
                println!("{}", name);
            }
            Ok(())
        }
        None => {
            let target = match cli.log_file.as_deref() {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Off,
            };
            logging::init(target)?;
            let config = load_config(cli.config.as_deref())?;
            run_ui_mode(config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<WalletConfig> {
    WalletConfig::load(path).context("could not load wallet configuration")
}

fn run_check(
    config: &WalletConfig,
    card_number: &str,
    expiration_date: &str,
    cvv: &str,
    json: bool,
) -> Result<()> {
    // Same path as keystrokes in the form: format first, then validate
    let mut form = AccountForm::default();
    form.set_card_number(card_number);
    form.set_expiration_date(expiration_date);
    form.set_cvv(cvv);
    let outcome = form.submit(&config.placeholder_logo);

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
    } else {
        let validity = form.validity;
        println!("Card number:     {:<22} {}", form.card_number, mark(validity.card_number));
        println!(
            "Expiration date: {:<22} {}",
            form.expiration_date,
            mark(validity.expiration_date)
        );
        println!("CVV:             {:<22} {}", "***", mark(validity.cvv));
    }

    match outcome {
        SubmissionOutcome::Accepted(account) => {
            info!(card = %account.masked_card_number(), "card details valid");
            Ok(())
        }
        SubmissionOutcome::Rejected(flags) => {
            bail!("invalid fields: {}", flags.invalid_fields().join(", "))
        }
    }
}

fn mark(valid: bool) -> &'static str {
    if valid {
        "✓"
    } else {
        "✗ invalid"
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: WalletConfig) -> Result<()> {
    info!(banks = config.banks.len(), "starting wallet UI");

    let mut app = ui::App::new(card_wallet::WalletState::new(&config));
    ui::run_ui(&mut app)?;

    info!(accounts = app.wallet.registry.len(), "wallet UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: WalletConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or validate a card with: card-wallet check --help");
    std::process::exit(1);
}
