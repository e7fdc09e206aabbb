use secrecy::SecretString;
use serde::Deserialize;

/// One seed account: the mnemonic/passphrase pair keys derive from, plus the
/// password protecting the derived keys inside the node keystore.
///
/// All three are long-lived secrets; they are read-only after construction
/// and safe to share across any number of concurrent derivations.
#[derive(Debug, Deserialize)]
pub struct SeedAccount {
    pub mnemonic: SecretString,
    /// BIP-39 passphrase mixed into seed derivation.
    pub passphrase: SecretString,
    /// Keystore passphrase used for `personal_importRawKey` and
    /// `personal_sendTransaction`.
    pub account_password: SecretString,
}

/// Façade configuration. The collection account holds pooled funds and
/// always derives at index 0; user deposit addresses derive from the
/// separate user seed at their own indices.
#[derive(Debug, Deserialize)]
pub struct WalletConfig {
    /// Upstream node URL, e.g. `http://127.0.0.1:8545`.
    pub node_url: String,
    pub collection: SeedAccount,
    pub user: SeedAccount,
}
