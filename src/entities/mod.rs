// Entity Models
//
// - account: the registered card VALUE and the ordered registry holding them
// - bank: the fixed list of banks the entry form offers

pub mod account;
pub mod bank;

pub use account::{AccountRegistry, AccountSummary, BankAccount};
pub use bank::{BankChoices, DEFAULT_BANKS, UNSELECTED_BANK_LABEL};
