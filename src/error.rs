// ⚠️ Errors for the ambient layers (config, logging)
//
// The form/registry core never fails: formatting is total and validation
// yields flags. Only loading configuration and opening the log file can.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config must list at least one bank")]
    EmptyBankList,

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    LogInit(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, WalletError>;
