//! The posting pipeline: validate, rate-limit, build, sign, submit, confirm.
//!
//! Submission routes through the sponsor when the wallet kind is eligible
//! and the sponsor is available; otherwise the sender pays its own fees.
//! Write failures are surfaced without retry.

use crate::chain::{
    Address, ChainClient, EntryFunctionPayload, TransactionRequest, TxHash,
};
use crate::config::PostingConfig;
use crate::posting::error::PostError;
use crate::posting::rate_limit::RateLimiter;
use crate::posting::validate::ContentPolicy;
use crate::sponsor::SponsorClient;
use crate::wallet::WalletAdapter;

/// Result of a successful post.
#[derive(Debug, Clone)]
pub struct PostReceipt {
    pub hash: TxHash,
    /// Whether the sponsor paid the fees.
    pub sponsored: bool,
    /// Ledger version the transaction committed at, when known.
    pub version: Option<String>,
}

/// Drives a message from raw text to a confirmed on-chain transaction.
pub struct PostPipeline {
    chain: ChainClient,
    sponsor: SponsorClient,
    policy: ContentPolicy,
    limiter: RateLimiter,
    /// Gas cap for self-paid submissions.
    self_paid_gas: u64,
    contract: Address,
    module_name: String,
}

impl PostPipeline {
    pub fn new(
        chain: ChainClient,
        sponsor: SponsorClient,
        policy: ContentPolicy,
        limiter: RateLimiter,
        posting: &PostingConfig,
    ) -> Result<Self, crate::chain::ChainError> {
        let contract = Address::parse(&chain.config().contract_address)?;
        let module_name = chain.config().module_name.clone();
        Ok(Self {
            chain,
            sponsor,
            policy,
            limiter,
            self_paid_gas: posting.max_gas_amount,
            contract,
            module_name,
        })
    }

    /// Whether a post from this wallet would be sponsored.
    pub fn would_sponsor(&self, wallet: &dyn WalletAdapter, allow_sponsor: bool) -> bool {
        allow_sponsor && wallet.kind().sponsorship_eligible() && self.sponsor.available()
    }

    /// Post a message to the billboard and wait for confirmation.
    pub async fn post(
        &self,
        wallet: &dyn WalletAdapter,
        content: &str,
        allow_sponsor: bool,
    ) -> Result<PostReceipt, PostError> {
        let sender = wallet.address().ok_or(PostError::NotConnected)?.clone();

        self.policy.check(content)?;

        self.limiter
            .check(&sender)
            .map_err(|retry_after_secs| PostError::RateLimited { retry_after_secs })?;

        let sponsored = self.would_sponsor(wallet, allow_sponsor);
        let tx = self.build_transaction(&sender, content, sponsored).await?;

        let signing_message = self.chain.encode_submission(&tx).await?;
        let authenticator = wallet.sign(&signing_message).await?;

        let hash = if sponsored {
            self.sponsor.sponsor_submit(&tx, &authenticator).await?
        } else {
            self.chain.submit(&tx, &authenticator).await?
        };
        tracing::info!(tx_hash = %hash, sponsored = sponsored, "transaction submitted");

        let committed = self.chain.wait_for_transaction(&hash).await?;
        tracing::info!(
            tx_hash = %hash,
            version = committed.version.as_deref().unwrap_or("unknown"),
            "transaction confirmed"
        );

        Ok(PostReceipt {
            hash,
            sponsored,
            version: committed.version,
        })
    }

    /// Build the `send_message` transaction for the chosen payment route.
    async fn build_transaction(
        &self,
        sender: &Address,
        content: &str,
        sponsored: bool,
    ) -> Result<TransactionRequest, PostError> {
        let account = self.chain.account(sender).await?;

        let max_gas = if sponsored {
            self.sponsor.max_gas_amount()
        } else {
            self.self_paid_gas
        };

        Ok(TransactionRequest {
            sender: sender.clone(),
            sequence_number: account.sequence_number,
            max_gas_amount: max_gas.to_string(),
            gas_unit_price: self.chain.config().gas_unit_price.to_string(),
            expiration_timestamp_secs: self.chain.expiration_timestamp().to_string(),
            payload: EntryFunctionPayload::new(
                format!("{}::{}::send_message", self.contract, self.module_name),
                vec![
                    serde_json::Value::String(self.contract.to_string()),
                    serde_json::Value::String(content.to_string()),
                ],
            ),
            fee_payer: sponsored.then_some(true),
        })
    }
}
