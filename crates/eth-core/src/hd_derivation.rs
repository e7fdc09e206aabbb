use bip32::{DerivationPath, XPrv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::error::CoreError;
use crate::mnemonic;

/// Formats the BIP-44 Ethereum path for an address index:
/// `m/44'/60'/0'/0/{index}` (hardened purpose/coin/account, public change
/// and address levels).
pub fn derivation_path(index: u32) -> String {
    format!("m/44'/60'/0'/0/{index}")
}

/// A secp256k1 key derived for one address index.
///
/// The private key is zeroized on drop; callers that hex-encode it for
/// keystore import should not hold the encoding longer than the import call.
#[cfg_attr(test, derive(Debug))]
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_uncompressed: [u8; 65],
    pub derivation_path: String,
    pub derivation_index: u32,
}

impl DerivedKey {
    /// Private key as unprefixed lowercase hex, the form expected by
    /// `personal_importRawKey`.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Derives the key at `m/44'/60'/0'/0/{index}` from a mnemonic + passphrase.
///
/// The mapping (mnemonic, passphrase, index) -> key is pure and
/// deterministic; re-deriving with identical inputs reproduces byte-identical
/// keys, which is what allows address recovery without persisted key storage.
pub fn derive_key(
    mnemonic_phrase: &str,
    passphrase: &str,
    index: u32,
) -> Result<DerivedKey, CoreError> {
    let mut seed = mnemonic::mnemonic_to_seed(mnemonic_phrase, passphrase)?;

    let path_str = derivation_path(index);
    let path: DerivationPath = path_str
        .parse()
        .map_err(|e: bip32::Error| CoreError::DerivationFailed(e.to_string()))?;

    let xprv = XPrv::derive_from_path(&seed, &path);
    seed.zeroize();
    let xprv = xprv.map_err(|e| CoreError::DerivationFailed(e.to_string()))?;

    let private_key: [u8; 32] = xprv.to_bytes().into();
    let signing_key = SigningKey::from_bytes(&private_key.into())
        .map_err(|e| CoreError::DerivationFailed(e.to_string()))?;

    let public_key_uncompressed: [u8; 65] = signing_key
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| CoreError::DerivationFailed("unexpected public key length".into()))?;

    Ok(DerivedKey {
        private_key,
        public_key_uncompressed,
        derivation_path: path_str,
        derivation_index: index,
    })
}
