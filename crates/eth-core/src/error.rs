use thiserror::Error;

/// Errors from the pure wallet primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unit conversion failed: {0}")]
    Conversion(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = CoreError::InvalidMnemonic("bad checksum".into());
        assert_eq!(err.to_string(), "invalid mnemonic: bad checksum");

        let err = CoreError::Conversion("too many digits".into());
        assert_eq!(err.to_string(), "unit conversion failed: too many digits");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(CoreError::Decode("truncated".into()));
        assert!(err.to_string().contains("truncated"));
    }
}
