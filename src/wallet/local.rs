//! Local-key wallet backed by an ed25519 signing key.
//!
//! # Security
//! - The key is loaded ONLY from an environment variable
//! - The key is never logged; Debug output is redacted

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};

use crate::chain::{Address, Authenticator};
use crate::wallet::{WalletAdapter, WalletError, WalletKind};

/// Environment variable name for the hex-encoded signing key.
pub const SIGNING_KEY_ENV_VAR: &str = "BILLBOARD_SIGNING_KEY";

/// Environment variable name for the wallet's account address.
pub const ACCOUNT_ADDRESS_ENV_VAR: &str = "BILLBOARD_ACCOUNT_ADDRESS";

/// Wallet holding its own ed25519 key, signing locally.
pub struct LocalKeyWallet {
    signing_key: SigningKey,
    address: Address,
    connected: bool,
}

impl LocalKeyWallet {
    /// Create a wallet from a hex-encoded 32-byte key (0x prefix optional).
    pub fn from_hex_key(key_hex: &str, address: Address) -> Result<Self, WalletError> {
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let key_bytes = hex::decode(key_hex)
            .map_err(|e| WalletError::Key(format!("invalid key encoding: {}", e)))?;
        let key_array: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| WalletError::Key("signing key must be exactly 32 bytes".to_string()))?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&key_array),
            address,
            connected: false,
        })
    }

    /// Load the wallet key from `BILLBOARD_SIGNING_KEY`.
    pub fn from_env(address: Address) -> Result<Self, WalletError> {
        let key = std::env::var(SIGNING_KEY_ENV_VAR).map_err(|_| {
            WalletError::Key(format!(
                "environment variable {} not set",
                SIGNING_KEY_ENV_VAR
            ))
        })?;
        Self::from_hex_key(&key, address)
    }

    /// Hex-encoded public key with 0x prefix.
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().as_bytes()))
    }
}

impl std::fmt::Debug for LocalKeyWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeyWallet")
            .field("address", &self.address)
            .field("connected", &self.connected)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl WalletAdapter for LocalKeyWallet {
    fn name(&self) -> &str {
        "local-key"
    }

    fn kind(&self) -> WalletKind {
        WalletKind::LocalKey
    }

    async fn connect(&mut self) -> Result<Address, WalletError> {
        self.connected = true;
        Ok(self.address.clone())
    }

    async fn disconnect(&mut self) -> Result<(), WalletError> {
        self.connected = false;
        Ok(())
    }

    fn address(&self) -> Option<&Address> {
        self.connected.then_some(&self.address)
    }

    async fn sign(&self, signing_message: &[u8]) -> Result<Authenticator, WalletError> {
        if !self.connected {
            return Err(WalletError::NotConnected);
        }
        let signature = self.signing_key.sign(signing_message);
        Ok(Authenticator::ed25519(
            self.public_key_hex(),
            format!("0x{}", hex::encode(signature.to_bytes())),
        ))
    }
}
