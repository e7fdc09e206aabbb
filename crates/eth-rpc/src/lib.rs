//! The narrow JSON-RPC boundary between the wallet and its Ethereum node.
//!
//! [`NodeTransport`] is the full set of upstream operations the wallet
//! needs, one method per RPC call, so the façade can be exercised against an
//! in-memory double. [`http::HttpTransport`] is the production
//! implementation.

use alloy_primitives::U256;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub mod error;
pub mod http;
pub mod types;

pub use error::RpcError;
pub use http::HttpTransport;
pub use types::{
    BlockTag, BlockTransactions, LogFilter, RpcBlock, RpcLog, RpcReceipt, RpcTransaction,
    TransactionRequest,
};

/// An unbounded sequence of blocks, ascending by height.
pub type BlockStream = BoxStream<'static, Result<RpcBlock, RpcError>>;
/// An unbounded sequence of matching logs, in node order.
pub type LogStream = BoxStream<'static, Result<RpcLog, RpcError>>;

/// Upstream node operations required by the wallet.
///
/// Every method maps to exactly one RPC call; none of them retries. An
/// error object in the node's response surfaces as [`RpcError::Node`] with
/// the upstream message passed through unmodified.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// `personal_importRawKey`: registers a private key with the node
    /// keystore under the given passphrase, returning the public address.
    /// Importing the same key twice is the node's concern; callers only
    /// inspect the response for an error.
    async fn import_raw_key(
        &self,
        private_key_hex: &str,
        passphrase: &str,
    ) -> Result<String, RpcError>;

    /// `eth_getBalance` at the given block tag, in wei.
    async fn balance(&self, address: &str, tag: BlockTag) -> Result<U256, RpcError>;

    /// `eth_getTransactionCount`: the next account nonce.
    async fn transaction_count(&self, address: &str, tag: BlockTag) -> Result<u64, RpcError>;

    /// `personal_sendTransaction`: signs inside the node keystore with the
    /// account's registered passphrase and broadcasts, returning the hash.
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
        passphrase: &str,
    ) -> Result<String, RpcError>;

    /// `eth_getTransactionByHash`; `None` when the node does not know the hash.
    async fn transaction_by_hash(&self, hash: &str)
        -> Result<Option<RpcTransaction>, RpcError>;

    /// `eth_getTransactionReceipt`; `None` until the transaction is mined.
    async fn transaction_receipt(&self, hash: &str) -> Result<Option<RpcReceipt>, RpcError>;

    /// `eth_getBlockByNumber`, with full transaction objects when
    /// `full_transactions` is set.
    async fn block_by_number(
        &self,
        number: u64,
        full_transactions: bool,
    ) -> Result<Option<RpcBlock>, RpcError>;

    /// `eth_gasPrice`, in wei per gas.
    async fn gas_price(&self) -> Result<U256, RpcError>;

    /// `eth_blockNumber`: the current chain height.
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Read-only `eth_call` against a contract, returning the hex-encoded
    /// return data.
    async fn call(&self, to: &str, data: &str, tag: BlockTag) -> Result<String, RpcError>;

    /// Every block from `from_height` onward, historical then live, strictly
    /// ascending with no gaps or duplicates. Dropping the stream cancels it
    /// and releases whatever the transport holds for it.
    fn subscribe_blocks(&self, from_height: u64) -> BlockStream;

    /// Every log matching `filter` from its start height onward, in node
    /// order, transitioning from historical to live without gaps. Same
    /// cancellation contract as [`Self::subscribe_blocks`].
    fn subscribe_logs(&self, filter: LogFilter) -> LogStream;
}
