//! JSON-RPC 2.0 over HTTP.
//!
//! Subscriptions are polling generators: nothing is fetched until the
//! consumer polls (backpressure), and dropping the stream stops the polling
//! loop at the next await point. No node-side filter objects are installed,
//! so cancellation has nothing to leak.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use async_stream::stream;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RpcError;
use crate::types::{
    BlockTag, LogFilter, RpcBlock, RpcLog, RpcReceipt, RpcTransaction, TransactionRequest,
};
use crate::{BlockStream, LogStream, NodeTransport};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    message: String,
}

/// JSON-RPC client for a single upstream node.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: reqwest::Url,
    next_id: Arc<AtomicU64>,
    poll_interval: Duration,
}

impl HttpTransport {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let url = url
            .parse()
            .map_err(|e| RpcError::Transport(format!("invalid node URL {url}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            next_id: Arc::new(AtomicU64::new(1)),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// How often the live tail of a subscription checks for a new head.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, "rpc request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| RpcError::Transport(format!("unreadable response to {method}: {e}")))?;

        if let Some(err) = envelope.error {
            tracing::warn!(method, message = %err.message, "node returned an error");
            return Err(RpcError::Node(err.message));
        }

        serde_json::from_value(envelope.result.unwrap_or(Value::Null))
            .map_err(|e| RpcError::Transport(format!("malformed result for {method}: {e}")))
    }

    async fn get_logs(
        &self,
        from_block: u64,
        to_block: u64,
        topics: &[String],
    ) -> Result<Vec<RpcLog>, RpcError> {
        self.request(
            "eth_getLogs",
            json!([{
                "fromBlock": format!("0x{from_block:x}"),
                "toBlock": format!("0x{to_block:x}"),
                "topics": topics,
            }]),
        )
        .await
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn import_raw_key(
        &self,
        private_key_hex: &str,
        passphrase: &str,
    ) -> Result<String, RpcError> {
        self.request("personal_importRawKey", json!([private_key_hex, passphrase]))
            .await
    }

    async fn balance(&self, address: &str, tag: BlockTag) -> Result<U256, RpcError> {
        self.request("eth_getBalance", json!([address, tag.as_str()]))
            .await
    }

    async fn transaction_count(&self, address: &str, tag: BlockTag) -> Result<u64, RpcError> {
        let count: U256 = self
            .request("eth_getTransactionCount", json!([address, tag.as_str()]))
            .await?;
        u64::try_from(count).map_err(|_| RpcError::Transport(format!("nonce {count} out of range")))
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
        passphrase: &str,
    ) -> Result<String, RpcError> {
        self.request("personal_sendTransaction", json!([request, passphrase]))
            .await
    }

    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<RpcTransaction>, RpcError> {
        self.request("eth_getTransactionByHash", json!([hash])).await
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<RpcReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }

    async fn block_by_number(
        &self,
        number: u64,
        full_transactions: bool,
    ) -> Result<Option<RpcBlock>, RpcError> {
        self.request(
            "eth_getBlockByNumber",
            json!([format!("0x{number:x}"), full_transactions]),
        )
        .await
    }

    async fn gas_price(&self) -> Result<U256, RpcError> {
        self.request("eth_gasPrice", json!([])).await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let height: U256 = self.request("eth_blockNumber", json!([])).await?;
        u64::try_from(height)
            .map_err(|_| RpcError::Transport(format!("block height {height} out of range")))
    }

    async fn call(&self, to: &str, data: &str, tag: BlockTag) -> Result<String, RpcError> {
        self.request("eth_call", json!([{"to": to, "data": data}, tag.as_str()]))
            .await
    }

    fn subscribe_blocks(&self, from_height: u64) -> BlockStream {
        let transport = self.clone();

        Box::pin(stream! {
            let mut height = from_height;
            loop {
                let head = match transport.block_number().await {
                    Ok(head) => head,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                while height <= head {
                    match transport.block_by_number(height, true).await {
                        Ok(Some(block)) => {
                            yield Ok(block);
                            height += 1;
                        }
                        // Head moved but the block is not served yet; poll again.
                        Ok(None) => break,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }

                tokio::time::sleep(transport.poll_interval).await;
            }
        })
    }

    fn subscribe_logs(&self, filter: LogFilter) -> LogStream {
        let transport = self.clone();

        Box::pin(stream! {
            let mut next = filter.from_block;
            loop {
                let head = match transport.block_number().await {
                    Ok(head) => head,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                if next <= head {
                    match transport.get_logs(next, head, &filter.topics).await {
                        Ok(logs) => {
                            for log in logs {
                                yield Ok(log);
                            }
                            next = head + 1;
                        }
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }

                tokio::time::sleep(transport.poll_interval).await;
            }
        })
    }
}
