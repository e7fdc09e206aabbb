use eth_core::error::CoreError;
use eth_rpc::RpcError;
use thiserror::Error;

/// Caller-facing failure taxonomy of the wallet façade.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Rejected locally before any network call: malformed address,
    /// non-positive amount, sweep balance not above the fee.
    #[error("validation error: {0}")]
    Validation(String),

    /// The node answered with an error; the upstream message is passed
    /// through unmodified.
    #[error("node error: {0}")]
    Rpc(String),

    /// The node could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed mnemonic or underivable path.
    #[error("derivation error: {0}")]
    Derivation(String),
}

impl From<RpcError> for WalletError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Node(message) => WalletError::Rpc(message),
            RpcError::Transport(message) => WalletError::Transport(message),
        }
    }
}

impl From<CoreError> for WalletError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidMnemonic(m) | CoreError::DerivationFailed(m) => {
                WalletError::Derivation(m)
            }
            CoreError::InvalidAddress(m) | CoreError::Conversion(m) | CoreError::Decode(m) => {
                WalletError::Validation(m)
            }
        }
    }
}
