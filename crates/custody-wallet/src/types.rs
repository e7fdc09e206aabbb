use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A deposit address derived from the seed, with the path that reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: String,
    pub derivation_path: String,
    pub derivation_index: u32,
}

/// A transaction observed in a replayed block or fetched by hash.
///
/// `confirmations` is current height minus the transaction's block height,
/// computed at observation time: re-reading the same historical transaction
/// later yields a larger count.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTransaction {
    pub hash: String,
    pub from: Option<String>,
    /// `None` for contract-creation transactions.
    pub to: Option<String>,
    /// Value in ether.
    pub amount: Decimal,
    /// `None` while the transaction is pending.
    pub confirmations: Option<u64>,
    /// Raw call data, kept for ERC-20 deposit inspection.
    pub input: Option<String>,
    /// Timestamp of the containing block.
    pub timestamp: DateTime<Utc>,
}

/// Settlement outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub confirmations: u64,
}

/// Price/limit/fee triple for a data-less value transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasEstimate {
    /// Wei per gas.
    pub gas_price: U256,
    pub gas_limit: u64,
    /// `gas_price * gas_limit`, in ether.
    pub fee: Decimal,
}

/// One decoded ERC-20 `Transfer` log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20TransferEvent {
    pub transaction_hash: String,
    /// The token contract that emitted the log.
    pub contract_address: String,
}

/// Static token metadata read from the contract; each field is independently
/// absent when the contract does not implement the getter or the return
/// value does not decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Erc20TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Option<U256>,
}
