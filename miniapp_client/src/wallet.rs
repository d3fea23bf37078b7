use miniapp_server::data_objects::FinalPayload;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wmp_common::{Token, TokenAmount};

/// Version of the wallet capability interface this client speaks. Bump it when the request or payload
/// shape changes.
pub const WALLET_CAPABILITY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub symbol: Token,
    pub token_amount: TokenAmount,
}

/// The payment request handed to the wallet host: who to pay, how much of which tokens, a
/// human-readable description, and the single-use reference that ties the attempt to its server-side
/// confirmation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub reference: String,
    pub to: String,
    pub tokens: Vec<TokenTransfer>,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("The wallet capability failed. {0}")]
    CapabilityFailure(String),
}

/// A single, explicitly versioned interface to the host wallet's payment command. An implementation is
/// resolved once at startup; callers never probe the host object for ad-hoc method names per call.
#[allow(async_fn_in_trait)]
pub trait WalletCapability {
    fn version(&self) -> u32;

    /// Hands the payment request to the wallet's settlement UI and waits for the user to approve,
    /// reject or abandon it. The returned payload describes the outcome; a non-success status is an
    /// ordinary result, not an error.
    async fn pay(&self, request: &PaymentRequest) -> Result<FinalPayload, WalletError>;
}

/// Operator-driven wallet capability for terminal use: it prints the payment request, the operator
/// completes the transfer in the wallet host, and enters the resulting transaction id here.
pub struct ManualWallet;

impl ManualWallet {
    /// The manual wallet needs an interactive terminal; it cannot run headless.
    pub fn resolve() -> Option<Self> {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal().then_some(Self)
    }
}

impl WalletCapability for ManualWallet {
    fn version(&self) -> u32 {
        WALLET_CAPABILITY_VERSION
    }

    async fn pay(&self, request: &PaymentRequest) -> Result<FinalPayload, WalletError> {
        println!("Complete this payment in the wallet host:");
        println!("  reference:   {}", request.reference);
        println!("  to:          {}", request.to);
        for transfer in &request.tokens {
            println!("  amount:      {} {} (base units)", transfer.token_amount, transfer.symbol);
        }
        println!("  description: {}", request.description);
        let transaction_id: String = dialoguer::Input::new()
            .with_prompt("Transaction id reported by the wallet (leave empty to cancel)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WalletError::CapabilityFailure(e.to_string()))?;
        if transaction_id.trim().is_empty() {
            return Ok(FinalPayload {
                status: "cancelled".to_string(),
                transaction_id: None,
                reference: Some(request.reference.clone()),
            });
        }
        Ok(FinalPayload {
            status: "success".to_string(),
            transaction_id: Some(transaction_id.trim().to_string()),
            reference: Some(request.reference.clone()),
        })
    }
}
