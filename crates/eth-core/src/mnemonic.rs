use bip39::{Language, Mnemonic};

use crate::error::CoreError;

/// Checks whether a phrase is a well-formed BIP-39 mnemonic.
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Derives the 64-byte BIP-39 seed from a mnemonic + passphrase.
///
/// The caller must zeroize the returned seed once the derived key has been
/// extracted from it.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Vec<u8>, CoreError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| CoreError::InvalidMnemonic(e.to_string()))?;

    Ok(mnemonic.to_seed(passphrase).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn valid_mnemonic_accepted() {
        assert!(validate_mnemonic(TEST_MNEMONIC));
    }

    #[test]
    fn invalid_word_rejected() {
        assert!(!validate_mnemonic("abandon abandon notaword"));
    }

    #[test]
    fn bad_checksum_rejected() {
        // 12 valid words, wrong checksum word.
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(!validate_mnemonic(phrase));
    }

    #[test]
    fn seed_is_64_bytes() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        assert_eq!(seed.len(), 64);
    }

    #[test]
    fn seed_known_vector() {
        // Well-known seed for the all-"abandon" mnemonic with an empty passphrase.
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        assert_eq!(hex::encode(&seed[..8]), "5eb00bbddcf06908");
    }

    #[test]
    fn passphrase_changes_seed() {
        let a = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let b = mnemonic_to_seed(TEST_MNEMONIC, "custody").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_mnemonic_errors() {
        let err = mnemonic_to_seed("not a mnemonic", "").unwrap_err();
        assert!(matches!(err, CoreError::InvalidMnemonic(_)));
    }
}
