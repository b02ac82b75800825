use std::io::{self, Read};

use bitcoin::Txid;
use bitcoin_hashes::hex::FromHex;
use flate2::bufread::GzDecoder;

use crate::catalog::CatalogItem;
use crate::error::{LibraryError, Result};
use crate::source::TxSource;
use crate::types::{Transaction, TxOutput};

const LT: &str = "great_library::extractor";

/// Recovers files embedded in OP_RETURN outputs.
///
/// Holds no state besides the transaction source. Every call re-fetches the transaction,
/// nothing is cached.
pub struct Extractor<S: TxSource> {
    source: S,
}

impl<S: TxSource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Extractor { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the transaction and reconstruct the embedded file bytes.
    ///
    /// The first `trim_length` bytes of the raw OP_RETURN script are framing and are
    /// discarded. When `compressed` is set, the remainder is decoded as a gzip stream.
    pub fn extract(&self, txid: &Txid, compressed: bool, trim_length: usize) -> Result<Vec<u8>> {
        let tx = self.source.get_transaction(txid)?;
        let output = find_payload_output(&tx)?;

        let script = Vec::<u8>::from_hex(&output.script_hex)
            .map_err(LibraryError::InvalidScriptHex)?;
        let payload = strip_framing(&script, trim_length)?;

        let payload = if compressed {
            decompress(payload)?
        } else {
            payload.to_vec()
        };

        info!(
            target: LT,
            "extracted {} bytes from tx {} (script={} trim={} compressed={})",
            payload.len(),
            txid,
            script.len(),
            trim_length,
            compressed
        );
        Ok(payload)
    }

    /// Extract the file described by a catalog item
    pub fn fetch(&self, item: &CatalogItem) -> Result<Vec<u8>> {
        debug!(target: LT, "fetching \"{}\" from tx {}", item.title, item.txid);
        self.extract(&item.txid, item.compressed, item.hex_left_trim)
    }
}

/// Locate the data-carrying output. When several outputs qualify, the last one wins.
// XXX the last-match tie-break is kept as-is, "first match" may have been the intent
pub fn find_payload_output(tx: &Transaction) -> Result<&TxOutput> {
    let mut found = None;
    let mut matches = 0;
    for (vout, output) in tx.outputs.iter().enumerate() {
        let carrier = output.is_data_carrier();
        debug!(
            target: LT,
            "scanning {}:{} value={} data_carrier={}", tx.txid, vout, output.value, carrier
        );
        if carrier {
            found = Some(output);
            matches += 1;
        }
    }
    if matches > 1 {
        warn!(
            target: LT,
            "tx {} has {} OP_RETURN outputs, using the last one", tx.txid, matches
        );
    }
    found.ok_or_else(|| LibraryError::NoPayloadFound(tx.txid).into())
}

/// Drop the leading `trim_length` marker bytes
pub fn strip_framing(script: &[u8], trim_length: usize) -> Result<&[u8]> {
    ensure!(
        script.len() >= trim_length,
        LibraryError::TruncatedPayload {
            len: script.len(),
            trim: trim_length,
        }
    );
    Ok(&script[trim_length..])
}

/// Fully decode a single-member gzip stream. Any bytes left after the gzip trailer are an error.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(LibraryError::CorruptPayload)?;

    let trailing = decoder.into_inner().len();
    ensure!(
        trailing == 0,
        LibraryError::CorruptPayload(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} trailing bytes after the gzip stream", trailing),
        ))
    );
    Ok(decoded)
}
