// Card Wallet - Core Library
// Card entry formatting/validation, the account registry and the wallet state
// machine. Used by the TUI binary and by tests.

pub mod card;
pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod wallet;

// Re-export commonly used types
pub use card::{
    format_card_number, format_expiration_date, mask_card_number,
    is_valid_card_number, is_valid_expiration_date, is_valid_cvv,
    ValidityFlags,
};
pub use config::WalletConfig;
pub use entities::{
    AccountRegistry, AccountSummary, BankAccount, BankChoices,
};
pub use error::{Result, WalletError};
pub use wallet::{
    reduce, AccountForm, Action, FormStatus, SubmissionOutcome, WalletState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
