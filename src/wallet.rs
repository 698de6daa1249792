// 👛 Wallet State - entry form + registry behind one update function
//
// The presentation layer never mutates fields directly. It sends an Action,
// gets the next WalletState back, and re-renders:
//
//     (state, action) -> new state
//
// Submission flow:  Editing → Validating → Accepted | Rejected
// - all three validity flags are computed on every submit (no fail-fast)
// - Accepted: append account, clear the form, close it
// - Rejected: keep the form open with its text untouched

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::card::{format_card_number, format_expiration_date, ValidityFlags};
use crate::config::WalletConfig;
use crate::entities::{AccountRegistry, AccountSummary, BankAccount, BankChoices};

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show the entry form
    OpenForm,

    /// Dismiss the form without submitting; entered text and flags are kept
    CloseForm,

    /// New raw text of the card number field (formatted on arrival)
    CardNumberChanged(String),

    /// New raw text of the expiration field (formatted on arrival)
    ExpirationDateChanged(String),

    /// New text of the CVV field (stored as typed)
    CvvChanged(String),

    BankSelected(String),

    /// The "Add" button
    Submit,

    /// Per-row delete
    Remove(BankAccount),
}

// ============================================================================
// ENTRY FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormStatus {
    /// No submission yet, or the last one was accepted and the form reset
    Editing,

    /// Last submission failed; `validity` says which fields
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted(BankAccount),
    Rejected(ValidityFlags),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountForm {
    pub card_number: String,
    pub expiration_date: String,
    /// Never serialized; only its validity flag is reported
    #[serde(skip_serializing)]
    pub cvv: String,
    pub selected_bank: Option<String>,
    pub validity: ValidityFlags,
    pub status: FormStatus,
}

impl Default for AccountForm {
    fn default() -> Self {
        AccountForm {
            card_number: String::new(),
            expiration_date: String::new(),
            cvv: String::new(),
            selected_bank: None,
            validity: ValidityFlags::default(),
            status: FormStatus::Editing,
        }
    }
}

impl AccountForm {
    pub fn set_card_number(&mut self, raw: &str) {
        self.card_number = format_card_number(raw);
    }

    pub fn set_expiration_date(&mut self, raw: &str) {
        self.expiration_date = format_expiration_date(raw);
    }

    pub fn set_cvv(&mut self, raw: &str) {
        self.cvv = raw.to_string();
    }

    /// Validate every field and, if all pass, build the new account.
    ///
    /// Flags are stored on the form either way. Field text is never touched
    /// here; clearing after acceptance is the caller's job.
    pub fn submit(&mut self, bank_logo: &str) -> SubmissionOutcome {
        let flags = ValidityFlags::check(&self.card_number, &self.expiration_date, &self.cvv);
        self.validity = flags;

        if flags.all_valid() {
            self.status = FormStatus::Editing;
            SubmissionOutcome::Accepted(BankAccount::from_form(
                bank_logo.to_string(),
                &self.card_number,
                self.expiration_date.clone(),
                self.cvv.clone(),
            ))
        } else {
            self.status = FormStatus::Rejected;
            SubmissionOutcome::Rejected(flags)
        }
    }

    /// Empty all three fields and mark them valid again.
    ///
    /// The selected bank survives the reset.
    pub fn reset(&mut self) {
        self.card_number.clear();
        self.expiration_date.clear();
        self.cvv.clear();
        self.validity = ValidityFlags::default();
        self.status = FormStatus::Editing;
    }
}

// ============================================================================
// WALLET STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WalletState {
    pub registry: AccountRegistry,
    pub form: AccountForm,
    pub is_adding_account: bool,
    pub banks: BankChoices,
    pub placeholder_logo: String,
    pub mask_card_numbers: bool,
}

impl WalletState {
    pub fn new(config: &WalletConfig) -> Self {
        WalletState {
            registry: AccountRegistry::new(),
            form: AccountForm::default(),
            is_adding_account: false,
            banks: config.banks.clone(),
            placeholder_logo: config.placeholder_logo.clone(),
            mask_card_numbers: config.mask_card_numbers,
        }
    }

    /// Drives the "your wallet is empty" screen
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn summaries(&self) -> Vec<AccountSummary> {
        self.registry.summaries(self.mask_card_numbers)
    }

    /// Apply one action in place.
    ///
    /// Returns the submission outcome for `Action::Submit`, `None` otherwise.
    pub fn apply(&mut self, action: Action) -> Option<SubmissionOutcome> {
        match action {
            Action::OpenForm => {
                debug!("entry form opened");
                self.is_adding_account = true;
            }
            Action::CloseForm => {
                debug!("entry form dismissed");
                self.is_adding_account = false;
            }
            Action::CardNumberChanged(raw) => self.form.set_card_number(&raw),
            Action::ExpirationDateChanged(raw) => self.form.set_expiration_date(&raw),
            Action::CvvChanged(raw) => self.form.set_cvv(&raw),
            Action::BankSelected(name) => {
                if !self.banks.contains(&name) {
                    warn!(bank = %name, "ignoring unknown bank selection");
                    return None;
                }
                self.form.selected_bank = Some(name);
            }
            Action::Submit => return Some(self.submit()),
            Action::Remove(account) => {
                if self.registry.remove(&account) {
                    info!(
                        card = %account.masked_card_number(),
                        remaining = self.registry.len(),
                        "account removed"
                    );
                } else {
                    warn!(card = %account.masked_card_number(), "remove: account not registered");
                }
            }
        }
        None
    }

    fn submit(&mut self) -> SubmissionOutcome {
        let outcome = self.form.submit(&self.placeholder_logo);

        match &outcome {
            SubmissionOutcome::Accepted(account) => {
                self.registry.append(account.clone());
                self.form.reset();
                self.is_adding_account = false;
                info!(
                    card = %account.masked_card_number(),
                    total = self.registry.len(),
                    "account added"
                );
            }
            SubmissionOutcome::Rejected(flags) => {
                debug!(
                    card_number = flags.card_number,
                    expiration_date = flags.expiration_date,
                    cvv = flags.cvv,
                    "submission rejected"
                );
            }
        }

        outcome
    }
}

/// Pure update: consume the current state, return the next one.
pub fn reduce(mut state: WalletState, action: Action) -> WalletState {
    state.apply(action);
    state
}

// ============================================================================
// TESTS
// ============================================================================
