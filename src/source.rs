use std::sync::Arc;

use bitcoin::Txid;
use bitcoincore_rpc::{self as rpc, Client as RpcClient};

use crate::error::{Error, LibraryError, Result};
use crate::types::{Transaction, TxOutput};
use crate::util::bitcoincore_ext::{
    GetRawTransactionVerboseResult, RpcApiExt, RPC_INVALID_ADDRESS_OR_KEY,
};

/// Provides decoded transactions by their txid.
///
/// Implementations must report unknown transactions as `LibraryError::TransactionNotFound`.
pub trait TxSource {
    fn get_transaction(&self, txid: &Txid) -> Result<Transaction>;
}

impl<T: TxSource + ?Sized> TxSource for Arc<T> {
    fn get_transaction(&self, txid: &Txid) -> Result<Transaction> {
        (**self).get_transaction(txid)
    }
}

/// A `TxSource` backed by the node's json-rpc interface
pub struct RpcTxSource {
    rpc: Arc<RpcClient>,
}

impl RpcTxSource {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        RpcTxSource { rpc }
    }
}

impl TxSource for RpcTxSource {
    fn get_transaction(&self, txid: &Txid) -> Result<Transaction> {
        let reply = self
            .rpc
            .get_raw_transaction_verbose(txid)
            .map_err(|e| map_rpc_error(txid, e))?;
        trace!("getrawtransaction {}: {:?}", txid, reply);
        verified_transaction(txid, reply)
    }
}

/// Report the node's "no such transaction" reply as `TransactionNotFound`, pass through anything else
pub fn map_rpc_error(txid: &Txid, err: rpc::Error) -> Error {
    match err {
        rpc::Error::JsonRpc(rpc::jsonrpc::Error::Rpc(ref e))
            if e.code == RPC_INVALID_ADDRESS_OR_KEY =>
        {
            debug!("getrawtransaction {} failed: {}", txid, e.message);
            LibraryError::TransactionNotFound(*txid).into()
        }
        e => e.into(),
    }
}

/// Convert the node's reply, making sure it describes the requested transaction
pub fn verified_transaction(
    txid: &Txid,
    reply: GetRawTransactionVerboseResult,
) -> Result<Transaction> {
    ensure!(
        reply.txid == *txid,
        "node returned transaction {} when asked for {}",
        reply.txid,
        txid
    );
    Ok(reply.into())
}

impl From<GetRawTransactionVerboseResult> for Transaction {
    fn from(tx: GetRawTransactionVerboseResult) -> Self {
        let mut vout = tx.vout;
        // peercoind lists outputs in order, but don't rely on it
        vout.sort_by_key(|out| out.n);
        Transaction {
            txid: tx.txid,
            outputs: vout
                .into_iter()
                .map(|out| TxOutput {
                    value: out.value,
                    script_asm: out.script_pub_key.asm,
                    script_hex: out.script_pub_key.hex,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use bitcoin::Amount;
    use rpc::jsonrpc::error::RpcError;

    const TXID: &str = "3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430";

    fn rpc_error(code: i32) -> rpc::Error {
        let err: RpcError = serde_json::from_value(json!({
            "code": code,
            "message": "No such mempool or blockchain transaction. Use gettransaction for wallet transactions.",
        }))
        .unwrap();
        rpc::Error::JsonRpc(rpc::jsonrpc::Error::Rpc(err))
    }

    fn reply(txid: &str) -> GetRawTransactionVerboseResult {
        serde_json::from_value(json!({
            "txid": txid,
            "vout": [{
                "value": 0.0,
                "n": 0,
                "scriptPubKey": { "asm": "OP_RETURN 48656c6c6f", "hex": "6a0548656c6c6f" }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_tx_rpc_error() {
        let txid = Txid::from_str(TXID).unwrap();
        let err = map_rpc_error(&txid, rpc_error(RPC_INVALID_ADDRESS_OR_KEY));
        match err.downcast_ref::<LibraryError>() {
            Some(LibraryError::TransactionNotFound(t)) => assert_eq!(*t, txid),
            _ => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn test_other_rpc_errors_pass_through() {
        let txid = Txid::from_str(TXID).unwrap();
        // RPC_INVALID_PARAMETER
        let err = map_rpc_error(&txid, rpc_error(-8));
        assert!(err.downcast_ref::<LibraryError>().is_none());
        match err.downcast_ref::<rpc::Error>() {
            Some(rpc::Error::JsonRpc(rpc::jsonrpc::Error::Rpc(e))) => assert_eq!(e.code, -8),
            _ => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn test_reply_txid_must_match() {
        let txid = Txid::from_str(TXID).unwrap();
        let tx = verified_transaction(&txid, reply(TXID)).unwrap();
        assert_eq!(tx.txid, txid);
        assert_eq!(tx.outputs.len(), 1);

        let other = "0000000000000000000000000000000000000000000000000000000000000001";
        assert!(verified_transaction(&txid, reply(other)).is_err());
    }

    #[test]
    fn test_verbose_tx_conversion() {
        // trimmed down peercoind reply, without the segwit-era fields
        let reply = json!({
            "txid": "3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430",
            "version": 1,
            "time": 1434576374,
            "locktime": 0,
            "vin": [],
            "vout": [
                {
                    "value": 0.0,
                    "n": 1,
                    "scriptPubKey": {
                        "asm": "OP_RETURN 48656c6c6f",
                        "hex": "6a0548656c6c6f",
                        "type": "nulldata"
                    }
                },
                {
                    "value": 1.5,
                    "n": 0,
                    "scriptPubKey": {
                        "asm": "OP_DUP OP_HASH160 1e4c4e9ab0b4cc2d8b6e0d9fbf2e54e93dbb7bc2 OP_EQUALVERIFY OP_CHECKSIG",
                        "hex": "76a9141e4c4e9ab0b4cc2d8b6e0d9fbf2e54e93dbb7bc288ac",
                        "reqSigs": 1,
                        "type": "pubkeyhash",
                        "addresses": ["PBeHvhU1fBCRcBtTzHYWJq3DftmdQHCHGt"]
                    }
                }
            ],
            "confirmations": 12
        });
        let result: GetRawTransactionVerboseResult = serde_json::from_value(reply).unwrap();
        assert_eq!(result.confirmations, Some(12));

        let tx: Transaction = result.into();
        assert_eq!(
            tx.txid.to_string(),
            "3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430"
        );
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, Amount::from_sat(150_000_000));
        assert!(!tx.outputs[0].is_data_carrier());
        assert_eq!(tx.outputs[1].value, Amount::from_sat(0));
        assert_eq!(tx.outputs[1].script_hex, "6a0548656c6c6f");
        assert!(tx.outputs[1].is_data_carrier());
    }
}
