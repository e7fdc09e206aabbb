//! Wire types for the subset of the Ethereum JSON-RPC surface the wallet
//! uses. Quantities are `U256` throughout and (de)serialize as 0x-prefixed
//! hex strings.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Block reference for balance/nonce/call queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// Last mined block: the confirmed view.
    Latest,
    /// Pending state including unmined transactions.
    Pending,
}

impl BlockTag {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockTag::Latest => "latest",
            BlockTag::Pending => "pending",
        }
    }
}

/// The transaction shape sent to `personal_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    /// Account nonce, fetched fresh per send.
    pub nonce: U256,
    pub gas_price: U256,
    /// Gas limit.
    pub gas: U256,
    /// Transfer value in wei.
    pub value: U256,
}

/// A transaction as returned by `eth_getTransactionByHash` or embedded in a
/// full block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: String,
    pub from: String,
    /// `None` for contract-creation transactions.
    pub to: Option<String>,
    pub value: U256,
    /// `None` while the transaction is pending.
    pub block_number: Option<U256>,
    pub input: Option<String>,
    #[serde(default)]
    pub gas_price: Option<U256>,
}

/// `eth_getTransactionReceipt` result; existence implies the transaction is
/// mined.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    pub from: String,
    pub to: Option<String>,
    pub block_number: U256,
    pub gas_used: U256,
}

/// A block, with transaction hashes or full objects depending on the query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: U256,
    /// Unix timestamp of the block, in seconds.
    pub timestamp: U256,
    #[serde(default)]
    pub transactions: BlockTransactions,
}

/// `eth_getBlockByNumber` returns hashes or objects based on its boolean
/// argument.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Full(Vec<RpcTransaction>),
    Hashes(Vec<String>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        BlockTransactions::Hashes(Vec::new())
    }
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Full(txs) => txs.len(),
            BlockTransactions::Hashes(hashes) => hashes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An entry from `eth_getLogs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    /// The emitting contract.
    pub address: String,
    pub transaction_hash: String,
    pub block_number: Option<U256>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Log subscription filter: a start height and the topics a log must carry.
/// The end is always the live head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub from_block: u64,
    pub topics: Vec<String>,
}
