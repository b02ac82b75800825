use std::io;

use bitcoin::Txid;
use bitcoin_hashes::hex;

pub use anyhow::{Context, Error, Result};

#[derive(thiserror::Error, Debug)]
pub enum LibraryError {
    #[error("Transaction {0} not found")]
    TransactionNotFound(Txid),

    #[error("Transaction {0} has no zero-value OP_RETURN output")]
    NoPayloadFound(Txid),

    #[error("Payload script is {len} bytes, shorter than the trim length of {trim}")]
    TruncatedPayload { len: usize, trim: usize },

    #[error("Corrupt compressed payload")]
    CorruptPayload(#[source] io::Error),

    #[error("Invalid script hex")]
    InvalidScriptHex(#[source] hex::Error),

    #[error("Unknown catalog item {0}")]
    UnknownItem(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

pub trait OptionExt<T> {
    fn or_err(self, context: &'static str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_err(self, context: &'static str) -> Result<T> {
        self.ok_or_else(|| Error::msg(context))
    }
}

pub fn fmt_error_chain(err: &Error) -> String {
    err.chain()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
