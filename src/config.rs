//! Configuration
//!
//! Everything here has a default, so the wallet runs with no config file.
//! An optional JSON file overrides the defaults:
//! ```json
//! {
//!   "banks": ["Bank A", "Bank B", "Bank C"],
//!   "placeholderLogo": "bankLogo",
//!   "maskCardNumbers": false
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::BankChoices;
use crate::error::{Result, WalletError};

/// Env var pointing at a config file (used when `--config` is not given)
pub const CONFIG_PATH_ENV: &str = "CARD_WALLET_CONFIG";

/// Env var overriding `maskCardNumbers`
pub const MASK_NUMBERS_ENV: &str = "CARD_WALLET_MASK_NUMBERS";

pub const DEFAULT_PLACEHOLDER_LOGO: &str = "bankLogo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletConfig {
    /// Banks offered by the entry form
    pub banks: BankChoices,

    /// Logo stored on every new account
    pub placeholder_logo: String,

    /// Show only the last four digits in the account list
    pub mask_card_numbers: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            banks: BankChoices::default(),
            placeholder_logo: DEFAULT_PLACEHOLDER_LOGO.to_string(),
            mask_card_numbers: false,
        }
    }
}

impl WalletConfig {
    /// Resolve the config from defaults, an optional file and env overrides.
    ///
    /// An explicit path must exist. A path coming from `CARD_WALLET_CONFIG`
    /// that does not exist falls back to the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let env_mask = std::env::var(MASK_NUMBERS_ENV).ok();
        Self::load_from(explicit, env_path, env_mask.as_deref())
    }

    /// `load` with the environment passed in instead of read.
    pub fn load_from(
        explicit: Option<&Path>,
        env_path: Option<PathBuf>,
        env_mask: Option<&str>,
    ) -> Result<Self> {
        let mut config = match (explicit, env_path) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            (None, Some(path)) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            (None, None) => Self::default(),
        };

        if let Some(mask) = parse_bool_env(env_mask) {
            config.mask_card_numbers = mask;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WalletError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| WalletError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), banks = config.banks.len(), "loaded config");
        Ok(config)
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.banks.is_empty() {
            return Err(WalletError::EmptyBankList);
        }
        Ok(())
    }
}

fn parse_bool_env(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}
