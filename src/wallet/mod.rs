//! Wallet layer: connection state machine, adapter trait, and session.
//!
//! The adapter abstracts how keys are held and how signing happens; the
//! session tracks connection status and the cached balance. Status moves
//! strictly `Disconnected -> Connecting -> {Connected, Error}`; disconnect
//! returns to `Disconnected` from anywhere.

pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::chain::{Address, Authenticator, ChainClient};
use crate::config::WalletConfig;

pub use local::{LocalKeyWallet, ACCOUNT_ADDRESS_ENV_VAR, SIGNING_KEY_ENV_VAR};

/// Connection status of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl WalletStatus {
    /// Whether moving to `next` is a legal transition.
    ///
    /// Connected and Error are only reachable through Connecting;
    /// Disconnected is reachable from anywhere.
    pub fn can_transition(self, next: WalletStatus) -> bool {
        use WalletStatus::*;
        match (self, next) {
            (_, Disconnected) => true,
            (Disconnected, Connecting) | (Error, Connecting) => true,
            (Connecting, Connected) | (Connecting, Error) => true,
            _ => false,
        }
    }
}

/// How the wallet holds its keys, which decides the payment route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    /// Direct-signing wallet with a local key; eligible for fee sponsorship.
    LocalKey,
    /// Social-login style wallet that signs through a delegate; pays its own fees.
    Delegated,
}

impl WalletKind {
    pub fn sponsorship_eligible(self) -> bool {
        matches!(self, WalletKind::LocalKey)
    }
}

/// Errors from wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet key error: {0}")]
    Key(String),

    #[error("wallet is not connected")]
    NotConnected,

    #[error("illegal status transition: {from:?} -> {to:?}")]
    IllegalTransition { from: WalletStatus, to: WalletStatus },

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("balance query failed: {0}")]
    Balance(String),
}

/// Abstraction over wallet implementations.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Display name of the wallet.
    fn name(&self) -> &str;

    /// Key-holding model of this wallet.
    fn kind(&self) -> WalletKind;

    /// Establish the wallet connection and return the account address.
    async fn connect(&mut self) -> Result<Address, WalletError>;

    /// Tear down the connection.
    async fn disconnect(&mut self) -> Result<(), WalletError>;

    /// Address of the connected account, if any.
    fn address(&self) -> Option<&Address>;

    /// Sign a transaction signing message, returning the sender authenticator.
    async fn sign(&self, signing_message: &[u8]) -> Result<Authenticator, WalletError>;
}

/// Base-unit balance as a 0-100 gauge percentage against the configured
/// full-gauge amount.
pub fn gauge_percent(balance: u64, config: &WalletConfig) -> f64 {
    let coins = ChainClient::to_display_coins(balance);
    (coins / config.full_gauge_coins * 100.0).min(100.0)
}

/// Wallet session: drives the status machine and caches the balance.
pub struct WalletSession {
    adapter: Box<dyn WalletAdapter>,
    status: WalletStatus,
    /// Cached balance in base units; zero when disconnected.
    balance: u64,
    config: WalletConfig,
}

impl WalletSession {
    pub fn new(adapter: Box<dyn WalletAdapter>, config: WalletConfig) -> Self {
        Self {
            adapter,
            status: WalletStatus::Disconnected,
            balance: 0,
            config,
        }
    }

    pub fn status(&self) -> WalletStatus {
        self.status
    }

    pub fn kind(&self) -> WalletKind {
        self.adapter.kind()
    }

    pub fn address(&self) -> Option<&Address> {
        self.adapter.address()
    }

    pub fn adapter(&self) -> &dyn WalletAdapter {
        self.adapter.as_ref()
    }

    /// Cached balance in base units.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Cached balance as a gauge percentage.
    pub fn gauge_percent(&self) -> f64 {
        gauge_percent(self.balance, &self.config)
    }

    fn transition(&mut self, next: WalletStatus) -> Result<(), WalletError> {
        if !self.status.can_transition(next) {
            return Err(WalletError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::debug!(from = ?self.status, to = ?next, "wallet status transition");
        self.status = next;
        Ok(())
    }

    /// Connect the wallet and fetch the initial balance.
    ///
    /// Drives Disconnected -> Connecting -> Connected, or -> Error when the
    /// adapter or the balance fetch fails.
    pub async fn connect(&mut self, chain: &ChainClient) -> Result<(), WalletError> {
        self.transition(WalletStatus::Connecting)?;

        let address = match self.adapter.connect().await {
            Ok(address) => address,
            Err(e) => {
                self.transition(WalletStatus::Error)?;
                tracing::warn!(error = %e, "wallet connection failed");
                return Err(e);
            }
        };

        match chain.account_balance(&address).await {
            Ok(balance) => {
                self.balance = balance;
                self.transition(WalletStatus::Connected)?;
                tracing::info!(
                    address = %address,
                    wallet = self.adapter.name(),
                    balance_coins = ChainClient::to_display_coins(balance),
                    "wallet connected"
                );
                Ok(())
            }
            Err(e) => {
                self.transition(WalletStatus::Error)?;
                tracing::warn!(error = %e, "balance fetch failed during connect");
                Err(WalletError::Balance(e.to_string()))
            }
        }
    }

    /// Disconnect and clear cached state.
    pub async fn disconnect(&mut self) -> Result<(), WalletError> {
        self.adapter.disconnect().await?;
        self.balance = 0;
        self.transition(WalletStatus::Disconnected)?;
        tracing::info!("wallet disconnected");
        Ok(())
    }

    /// Re-query the balance for a connected session.
    pub async fn refresh_balance(&mut self, chain: &ChainClient) -> Result<u64, WalletError> {
        if self.status != WalletStatus::Connected {
            return Err(WalletError::NotConnected);
        }
        let address = self.adapter.address().ok_or(WalletError::NotConnected)?;
        let balance = chain
            .account_balance(address)
            .await
            .map_err(|e| WalletError::Balance(e.to_string()))?;
        self.balance = balance;
        Ok(balance)
    }
}
