//! Pure Ethereum wallet primitives for the custody client.
//!
//! This crate provides:
//! - BIP-39 mnemonic handling and BIP-32/44 key derivation at the
//!   Ethereum path `m/44'/60'/0'/0/{index}`
//! - EIP-55 address derivation and syntactic address validation
//! - Exact wei/ether unit conversion (no floating point)
//! - Gas fee arithmetic for data-less value transfers
//! - Minimal ABI encoding/decoding for ERC-20 calls and call-data
//!
//! Everything here is synchronous and free of I/O; the transport and the
//! façade live in sibling crates.

pub mod abi;
pub mod address;
pub mod erc20;
pub mod error;
pub mod fee;
pub mod hd_derivation;
pub mod mnemonic;
pub mod units;
