use bitcoin::{Amount, Txid};
use bitcoincore_rpc::{Client, Result as RpcResult, RpcApi};

// Extensions for rust-bitcoincore-rpc

pub const RPC_INVALID_ADDRESS_OR_KEY: i32 = -5;

pub trait RpcApiExt: RpcApi {
    // The upstream GetRawTransactionResult requires fields that peercoind does not provide
    // (hash, vsize, weight), so only the ones we need are deserialized here.
    fn get_raw_transaction_verbose(&self, txid: &Txid) -> RpcResult<GetRawTransactionVerboseResult> {
        self.call("getrawtransaction", &[json!(txid), json!(true)])
    }
}

impl RpcApiExt for Client {}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct GetRawTransactionVerboseResult {
    pub txid: Txid,
    #[serde(default)]
    pub confirmations: Option<u32>,
    pub vout: Vec<GetRawTransactionVerboseVout>,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct GetRawTransactionVerboseVout {
    #[serde(with = "bitcoin::util::amount::serde::as_btc")]
    pub value: Amount,
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: GetRawTransactionVerboseScript,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct GetRawTransactionVerboseScript {
    pub asm: String,
    pub hex: String,
}
