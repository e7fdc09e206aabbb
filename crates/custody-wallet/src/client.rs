//! The wallet façade.

use std::sync::Arc;

use alloy_primitives::U256;
use eth_core::erc20::TransferCallInput;
use eth_core::hd_derivation::DerivedKey;
use eth_core::{abi, address, erc20, fee, hd_derivation, units};
use eth_rpc::{BlockTag, HttpTransport, NodeTransport};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::{SeedAccount, WalletConfig};
use crate::error::WalletError;
use crate::replay::{self, BlockTransactionStream, TransferEventStream};
use crate::tx;
use crate::types::{
    BlockTransaction, DerivedAddress, Erc20TokenMetadata, GasEstimate, TransactionReceipt,
};

/// The index the collection account always derives at.
const COLLECTION_INDEX: u32 = 0;

/// Custodial Ethereum wallet client.
///
/// Derives deposit addresses from the configured seeds, reads balances and
/// history, sends and sweeps ether through the node keystore, and replays
/// blocks and ERC-20 transfer logs for deposit detection. All state is
/// read-only configuration plus the transport handle, so any number of
/// operations and replay subscriptions may run concurrently.
pub struct EthereumClient {
    transport: Arc<dyn NodeTransport>,
    config: WalletConfig,
}

impl EthereumClient {
    pub fn new(transport: Arc<dyn NodeTransport>, config: WalletConfig) -> Self {
        Self { transport, config }
    }

    /// Connects over JSON-RPC HTTP to `config.node_url`.
    pub fn connect_http(config: WalletConfig) -> Result<Self, WalletError> {
        let transport = HttpTransport::new(&config.node_url)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    // ─── Addresses ───────────────────────────────────────────────

    /// Derives the collection key and registers it with the node keystore.
    /// Initial-setup call; re-importing the same key is safely ignorable by
    /// the node, and the response is checked for an error either way.
    #[instrument(skip(self))]
    pub async fn init_collection_address(&self) -> Result<String, WalletError> {
        let key = derive_account_key(&self.config.collection, COLLECTION_INDEX)?;
        let address = self.import_key(&key, &self.config.collection).await?;
        tracing::info!(%address, "collection address registered with the node keystore");
        Ok(address)
    }

    /// The collection address, derived locally; no network call.
    pub fn collection_address(&self) -> Result<String, WalletError> {
        let key = derive_account_key(&self.config.collection, COLLECTION_INDEX)?;
        Ok(address::pubkey_to_address(&key.public_key_uncompressed)?)
    }

    /// Derives the user deposit address at `index` and registers it with
    /// the node keystore.
    #[instrument(skip(self))]
    pub async fn new_address(&self, index: u32) -> Result<DerivedAddress, WalletError> {
        let key = derive_account_key(&self.config.user, index)?;
        let address = self.import_key(&key, &self.config.user).await?;
        tracing::info!(%address, index, "deposit address registered with the node keystore");

        Ok(DerivedAddress {
            address,
            derivation_path: key.derivation_path.clone(),
            derivation_index: index,
        })
    }

    /// Syntactic address check; checksums are verified only for mixed-case
    /// input.
    pub fn is_valid_address(&self, address: &str) -> bool {
        address::is_valid_address(address)
    }

    // ─── Balances and transfers ──────────────────────────────────

    /// Balance in ether; `confirmed` reads the latest block, otherwise the
    /// pending state.
    pub async fn address_balance(
        &self,
        address: &str,
        confirmed: bool,
    ) -> Result<Decimal, WalletError> {
        tx::validate_recipient(address)?;

        let tag = if confirmed {
            BlockTag::Latest
        } else {
            BlockTag::Pending
        };
        let wei = self.transport.balance(address, tag).await?;
        Ok(units::wei_to_ether(wei)?)
    }

    /// Sends `amount` ether from the collection address, spending at most
    /// `fee` ether on gas. Returns the broadcast transaction hash.
    #[instrument(skip(self), fields(%amount, %fee))]
    pub async fn send_from_collection(
        &self,
        to: &str,
        amount: Decimal,
        fee: Decimal,
    ) -> Result<String, WalletError> {
        tx::validate_recipient(to)?;
        tx::validate_amount(amount)?;

        let gas_price = fee::gas_price_for_fee(fee)?;
        let from = self.collection_address()?;
        tracing::info!(%from, to, "sending ether from the collection address");

        let balance = self.address_balance(&from, true).await?;
        if balance < amount + fee {
            return Err(WalletError::Validation(format!(
                "collection balance {balance} does not cover amount {amount} plus fee {fee}"
            )));
        }

        let hash = self
            .submit_transfer(&from, to, amount, gas_price, &self.config.collection)
            .await?;
        tracing::info!(%hash, "ether sent");
        Ok(hash)
    }

    /// Sweeps the entire confirmed balance of `from`, minus `fee`, to the
    /// collection address. The user account password authorizes the send.
    #[instrument(skip(self), fields(%fee))]
    pub async fn sweep_to_collection(
        &self,
        from: &str,
        fee: Decimal,
    ) -> Result<String, WalletError> {
        let balance = self.address_balance(from, true).await?;
        let amount = balance - fee;
        tracing::info!(%balance, %amount, from, "sweeping to the collection address");

        if amount <= Decimal::ZERO {
            return Err(WalletError::Validation(format!(
                "balance {balance} minus fee {fee} must be greater than zero"
            )));
        }

        let gas_price = fee::gas_price_for_fee(fee)?;
        let to = self.collection_address()?;
        let hash = self
            .submit_transfer(from, &to, amount, gas_price, &self.config.user)
            .await?;
        tracing::info!(%hash, "balance swept");
        Ok(hash)
    }

    // ─── Point queries ───────────────────────────────────────────

    /// A mined transaction with confirmations counted against the current
    /// height.
    pub async fn get_transaction(&self, hash: &str) -> Result<BlockTransaction, WalletError> {
        let tx = self
            .transport
            .transaction_by_hash(hash)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("transaction {hash} not found")))?;

        let mined_at = tx
            .block_number
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| WalletError::Rpc(format!("transaction {hash} is not yet mined")))?;

        let block = self
            .transport
            .block_by_number(mined_at, false)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("block {mined_at} not found")))?;
        let timestamp = replay::block_timestamp(&block)?;

        let current_height = self.transport.block_number().await?;
        replay::decode_transaction(&tx, timestamp, current_height)
    }

    /// Settlement outcome; errors until the transaction is mined.
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<TransactionReceipt, WalletError> {
        let receipt = self
            .transport
            .transaction_receipt(hash)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("no receipt for transaction {hash}")))?;

        let mined_at = u64::try_from(receipt.block_number).map_err(|_| {
            WalletError::Rpc(format!("block number {} out of range", receipt.block_number))
        })?;
        let current_height = self.transport.block_number().await?;

        Ok(TransactionReceipt {
            hash: receipt.transaction_hash,
            from: Some(receipt.from),
            to: receipt.to,
            confirmations: current_height.saturating_sub(mined_at),
        })
    }

    /// The fee actually paid: `gas_used * gas_price`, in ether.
    pub async fn get_transaction_fee(&self, hash: &str) -> Result<Decimal, WalletError> {
        let tx = self
            .transport
            .transaction_by_hash(hash)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("transaction {hash} not found")))?;
        let receipt = self
            .transport
            .transaction_receipt(hash)
            .await?
            .ok_or_else(|| WalletError::Rpc(format!("no receipt for transaction {hash}")))?;

        let gas_price = tx
            .gas_price
            .ok_or_else(|| WalletError::Rpc(format!("transaction {hash} has no gas price")))?;
        let fee_wei = receipt.gas_used.checked_mul(gas_price).ok_or_else(|| {
            WalletError::Rpc(format!("fee of transaction {hash} overflows"))
        })?;

        Ok(units::wei_to_ether(fee_wei)?)
    }

    // ─── Fees ────────────────────────────────────────────────────

    /// Fee estimate at the node's current gas price.
    pub async fn estimate_fee(&self) -> Result<GasEstimate, WalletError> {
        let gas_price = self.transport.gas_price().await?;
        tracing::info!(%gas_price, "current gas price");
        self.estimate_fee_at(gas_price)
    }

    /// Fee estimate at an explicit gas price (wei per gas).
    pub fn estimate_fee_at(&self, gas_price: U256) -> Result<GasEstimate, WalletError> {
        Ok(GasEstimate {
            gas_price,
            gas_limit: fee::TRANSFER_GAS_LIMIT,
            fee: fee::fee_for_gas_price(gas_price)?,
        })
    }

    // ─── ERC-20 ──────────────────────────────────────────────────

    /// Token metadata via read-only calls. A transport failure propagates;
    /// a return value that does not decode leaves that one field `None`.
    pub async fn erc20_metadata(
        &self,
        contract_address: &str,
    ) -> Result<Erc20TokenMetadata, WalletError> {
        tx::validate_recipient(contract_address)?;

        let name = self.token_call(contract_address, erc20::NAME_SELECTOR).await?;
        let symbol = self.token_call(contract_address, erc20::SYMBOL_SELECTOR).await?;
        let decimals = self
            .token_call(contract_address, erc20::DECIMALS_SELECTOR)
            .await?;
        let total_supply = self
            .token_call(contract_address, erc20::TOTAL_SUPPLY_SELECTOR)
            .await?;

        Ok(Erc20TokenMetadata {
            name: abi::decode_string_return(&name).ok(),
            symbol: abi::decode_string_return(&symbol).ok(),
            decimals: abi::decode_u8_return(&decimals).ok(),
            total_supply: abi::decode_uint256_word(&total_supply).ok(),
        })
    }

    /// Best-effort decode of raw `transfer(address,uint256)` call data; each
    /// field that fails to decode is absent, never an error.
    pub fn decode_erc20_input(&self, input: &str) -> TransferCallInput {
        let decoded = erc20::decode_transfer_input(input);
        if decoded.to.is_none() {
            tracing::warn!(input, "cannot decode recipient from call data");
        }
        if decoded.value.is_none() {
            tracing::warn!(input, "cannot decode amount from call data");
        }
        decoded
    }

    // ─── Replay streams ──────────────────────────────────────────

    /// Replays block transactions from `current height - replay_block_count`
    /// onward, transitioning into live blocks without gaps. Drop the stream
    /// to cancel.
    #[instrument(skip(self))]
    pub async fn replay_block_transactions(
        &self,
        replay_block_count: u64,
    ) -> Result<BlockTransactionStream, WalletError> {
        let start = self.replay_start(replay_block_count).await?;
        Ok(replay::block_transactions(Arc::clone(&self.transport), start))
    }

    /// Replays ERC-20 `Transfer` logs across all token contracts from the
    /// same computed start height.
    #[instrument(skip(self))]
    pub async fn replay_erc20_transfers(
        &self,
        replay_block_count: u64,
    ) -> Result<TransferEventStream, WalletError> {
        let start = self.replay_start(replay_block_count).await?;
        Ok(replay::erc20_transfers(Arc::clone(&self.transport), start))
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn replay_start(&self, replay_block_count: u64) -> Result<u64, WalletError> {
        let height = self.transport.block_number().await?;
        let start = height.saturating_sub(replay_block_count);
        tracing::info!(height, start, "replay start height computed");
        Ok(start)
    }

    async fn import_key(
        &self,
        key: &DerivedKey,
        account: &SeedAccount,
    ) -> Result<String, WalletError> {
        let address = self
            .transport
            .import_raw_key(
                &key.private_key_hex(),
                account.account_password.expose_secret(),
            )
            .await?;
        Ok(address)
    }

    async fn submit_transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        gas_price: U256,
        account: &SeedAccount,
    ) -> Result<String, WalletError> {
        // Fresh nonce per send; caching would collide on rapid sequential
        // sends.
        let nonce = self
            .transport
            .transaction_count(from, BlockTag::Latest)
            .await?;

        let request = tx::build_transfer(from, nonce, gas_price, to, units::ether_to_wei(amount)?);
        let hash = self
            .transport
            .send_transaction(&request, account.account_password.expose_secret())
            .await?;
        Ok(hash)
    }

    async fn token_call(
        &self,
        contract_address: &str,
        selector: [u8; 4],
    ) -> Result<Vec<u8>, WalletError> {
        let data = format!("0x{}", hex::encode(erc20::metadata_call(selector)));
        let returned = self
            .transport
            .call(contract_address, &data, BlockTag::Latest)
            .await?;
        // Undecodable hex is treated like an undecodable value: the caller
        // maps the empty result to an absent field.
        Ok(abi::hex_to_bytes(&returned).unwrap_or_default())
    }
}

fn derive_account_key(account: &SeedAccount, index: u32) -> Result<DerivedKey, WalletError> {
    Ok(hd_derivation::derive_key(
        account.mnemonic.expose_secret(),
        account.passphrase.expose_secret(),
        index,
    )?)
}
