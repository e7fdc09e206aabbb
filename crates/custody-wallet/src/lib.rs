//! Custodial Ethereum wallet client.
//!
//! An exchange-style interaction layer over a single trusted node: per-user
//! deposit addresses derived from one seed, balance and history reads,
//! sends and sweeps from a collection account, gas fee estimation, and
//! continuous block/ERC-20-log replay for deposit detection.
//!
//! The pure primitives live in `eth-core`, the node boundary in `eth-rpc`;
//! this crate composes them into [`EthereumClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod replay;
pub mod types;

mod tx;

pub use client::EthereumClient;
pub use config::{SeedAccount, WalletConfig};
pub use error::WalletError;
pub use eth_core::erc20::TransferCallInput;
pub use replay::{BlockTransactionStream, TransferEventStream};
pub use types::{
    BlockTransaction, DerivedAddress, Erc20TokenMetadata, Erc20TransferEvent, GasEstimate,
    TransactionReceipt,
};
