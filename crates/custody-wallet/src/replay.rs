//! Replay streams: historical-then-live block transactions and ERC-20
//! `Transfer` logs.
//!
//! Both streams are lazy generators over the transport's subscriptions, so
//! a slow consumer applies backpressure instead of forcing the producer to
//! buffer, and dropping the stream cancels the upstream subscription
//! deterministically. The first failure is yielded as `Err` and ends the
//! stream; resubscribing is the supervisor's call.

use std::sync::Arc;

use async_stream::stream;
use chrono::{DateTime, Utc};
use eth_core::{erc20, units};
use eth_rpc::{BlockTransactions, LogFilter, NodeTransport, RpcBlock, RpcTransaction};
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::WalletError;
use crate::types::{BlockTransaction, Erc20TransferEvent};

/// Per-block lists of decoded transactions, ascending by height.
pub type BlockTransactionStream = BoxStream<'static, Result<Vec<BlockTransaction>, WalletError>>;
/// Decoded `Transfer` logs in chain order.
pub type TransferEventStream = BoxStream<'static, Result<Erc20TransferEvent, WalletError>>;

pub(crate) fn block_transactions(
    transport: Arc<dyn NodeTransport>,
    from_height: u64,
) -> BlockTransactionStream {
    Box::pin(stream! {
        let mut blocks = transport.subscribe_blocks(from_height);
        while let Some(item) = blocks.next().await {
            let block = match item {
                Ok(block) => block,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            // Confirmations are relative to the height observed now, not the
            // block's own height, so backfilled history reports real depth.
            let current_height = match transport.block_number().await {
                Ok(height) => height,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            match decode_block(&block, current_height) {
                Ok(transactions) => yield Ok(transactions),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    })
}

pub(crate) fn erc20_transfers(
    transport: Arc<dyn NodeTransport>,
    from_height: u64,
) -> TransferEventStream {
    let filter = LogFilter {
        from_block: from_height,
        topics: vec![erc20::TRANSFER_EVENT_TOPIC.to_string()],
    };

    Box::pin(stream! {
        let mut logs = transport.subscribe_logs(filter);
        while let Some(item) = logs.next().await {
            match item {
                Ok(log) => yield Ok(Erc20TransferEvent {
                    transaction_hash: log.transaction_hash,
                    contract_address: log.address,
                }),
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            }
        }
    })
}

pub(crate) fn decode_block(
    block: &RpcBlock,
    current_height: u64,
) -> Result<Vec<BlockTransaction>, WalletError> {
    let timestamp = block_timestamp(block)?;

    let BlockTransactions::Full(transactions) = &block.transactions else {
        return Ok(Vec::new());
    };

    transactions
        .iter()
        .map(|tx| decode_transaction(tx, timestamp, current_height))
        .collect()
}

/// Maps one wire transaction into the domain shape, converting value to
/// ether and counting confirmations against `current_height`.
pub(crate) fn decode_transaction(
    tx: &RpcTransaction,
    timestamp: DateTime<Utc>,
    current_height: u64,
) -> Result<BlockTransaction, WalletError> {
    let confirmations = tx
        .block_number
        .and_then(|n| u64::try_from(n).ok())
        .map(|mined_at| current_height.saturating_sub(mined_at));

    Ok(BlockTransaction {
        hash: tx.hash.clone(),
        from: Some(tx.from.clone()),
        to: tx.to.clone(),
        amount: units::wei_to_ether(tx.value)?,
        confirmations,
        input: tx.input.clone(),
        timestamp,
    })
}

pub(crate) fn block_timestamp(block: &RpcBlock) -> Result<DateTime<Utc>, WalletError> {
    let secs = u64::try_from(block.timestamp).map_err(|_| {
        WalletError::Rpc(format!("block timestamp {} out of range", block.timestamp))
    })?;
    epoch_to_datetime(secs)
}

pub(crate) fn epoch_to_datetime(epoch_seconds: u64) -> Result<DateTime<Utc>, WalletError> {
    let secs = i64::try_from(epoch_seconds)
        .map_err(|_| WalletError::Rpc(format!("timestamp {epoch_seconds} out of range")))?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| WalletError::Rpc(format!("timestamp {epoch_seconds} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn wire_tx(block_number: Option<u64>, value_wei: u128) -> RpcTransaction {
        RpcTransaction {
            hash: "0xabc".into(),
            from: "0x1111111111111111111111111111111111111111".into(),
            to: Some("0x2222222222222222222222222222222222222222".into()),
            value: U256::from(value_wei),
            block_number: block_number.map(U256::from),
            input: Some("0x".into()),
            gas_price: None,
        }
    }

    #[test]
    fn confirmations_are_height_minus_block() {
        let tx = wire_tx(Some(100), 0);
        let decoded = decode_transaction(&tx, epoch_to_datetime(0).unwrap(), 105).unwrap();
        assert_eq!(decoded.confirmations, Some(5));
    }

    #[test]
    fn head_block_has_zero_confirmations() {
        let tx = wire_tx(Some(100), 0);
        let decoded = decode_transaction(&tx, epoch_to_datetime(0).unwrap(), 100).unwrap();
        assert_eq!(decoded.confirmations, Some(0));
    }

    #[test]
    fn pending_transaction_has_no_confirmations() {
        let tx = wire_tx(None, 0);
        let decoded = decode_transaction(&tx, epoch_to_datetime(0).unwrap(), 100).unwrap();
        assert_eq!(decoded.confirmations, None);
    }

    #[test]
    fn value_converts_to_ether() {
        let tx = wire_tx(Some(1), 500_000_000_000_000_000);
        let decoded = decode_transaction(&tx, epoch_to_datetime(0).unwrap(), 1).unwrap();
        assert_eq!(decoded.amount, Decimal::from_str("0.5").unwrap());
    }

    #[test]
    fn hash_only_block_decodes_empty() {
        let block = RpcBlock {
            number: U256::from(1u8),
            timestamp: U256::from(1_600_000_000u64),
            transactions: BlockTransactions::Hashes(vec!["0xaaa".into()]),
        };
        assert!(decode_block(&block, 1).unwrap().is_empty());
    }

    #[test]
    fn block_timestamp_becomes_utc_datetime() {
        let at = epoch_to_datetime(1_600_000_000).unwrap();
        assert_eq!(at.timestamp(), 1_600_000_000);
    }
}
