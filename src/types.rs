use std::fmt;
use std::str::FromStr;

use bitcoin::{Amount, Txid};

use crate::error::{Error, Result};

const OP_RETURN_ASM: &str = "OP_RETURN";

/// The format of an embedded file, selects how the payload gets presented
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Txt,
    Pdf,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Txt => "txt",
            FileType::Pdf => "pdf",
        }
    }

    pub fn is_text(self) -> bool {
        match self {
            FileType::Txt => true,
            FileType::Pdf => false,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "txt" => FileType::Txt,
            "pdf" => FileType::Pdf,
            _ => bail!("unknown file type '{}', expecting 'txt' or 'pdf'", s),
        })
    }
}

/// A decoded transaction, as returned by a `TxSource`
#[derive(Clone, Debug)]
pub struct Transaction {
    pub txid: Txid,
    /// Outputs in ledger order
    pub outputs: Vec<TxOutput>,
}

#[derive(Clone, Debug)]
pub struct TxOutput {
    pub value: Amount,
    /// The disassembled script (`asm`)
    pub script_asm: String,
    /// The raw script, hex encoded
    pub script_hex: String,
}

impl TxOutput {
    /// Whether this is a zero-value output whose script starts with OP_RETURN
    pub fn is_data_carrier(&self) -> bool {
        self.value.as_sat() == 0
            && self.script_asm.split_whitespace().next() == Some(OP_RETURN_ASM)
    }
}
