use anyhow::Result;
use log::*;
use miniapp_server::data_objects::{ConfirmPaymentResult, FinalPayload};

use crate::{
    client::PaymentServerClient,
    profile::ClientProfile,
    wallet::{PaymentRequest, TokenTransfer, WalletCapability},
};

/// Drives one payment attempt end to end: obtain a reference from the server, build the payment
/// request, hand it to the wallet capability, and report the outcome back for confirmation.
pub struct PaymentInitiator<W: WalletCapability> {
    profile: ClientProfile,
    client: PaymentServerClient,
    wallet: W,
}

impl<W: WalletCapability> PaymentInitiator<W> {
    pub fn new(profile: ClientProfile, client: PaymentServerClient, wallet: W) -> Self {
        Self { profile, client, wallet }
    }

    /// Runs the initiate-and-pay steps. `None` means the attempt was aborted, cancelled or failed;
    /// there are no automatic retries. Calling again starts a fresh attempt with a fresh reference,
    /// which supersedes the previous one on the server side.
    pub async fn initiate_and_send_payment(&self) -> Result<Option<FinalPayload>> {
        let reference = match self.client.initiate_payment().await {
            Ok(id) => id,
            Err(e) => {
                error!("Could not obtain a payment reference. {e}");
                println!("Could not start the payment. Please try again.");
                return Ok(None);
            },
        };
        info!("🪙️ Obtained payment reference {reference}");
        let request = self.build_payment_request(reference);
        debug!("Delegating payment to wallet capability v{}", self.wallet.version());
        match self.wallet.pay(&request).await {
            Ok(payload) => {
                info!("🪙️ Wallet reported payment status '{}'", payload.status);
                Ok(Some(payload))
            },
            Err(e) => {
                error!("The wallet could not execute the payment. {e}");
                println!("There was an error processing the payment.");
                Ok(None)
            },
        }
    }

    pub async fn confirm_payment(&self, payload: &FinalPayload) -> Result<ConfirmPaymentResult> {
        self.client.confirm_payment(payload).await
    }

    fn build_payment_request(&self, reference: String) -> PaymentRequest {
        let tokens = self
            .profile
            .transfers
            .iter()
            .map(|(token, amount)| TokenTransfer { symbol: *token, token_amount: *amount })
            .collect();
        PaymentRequest {
            reference,
            to: self.profile.recipient.clone(),
            tokens,
            description: self.profile.description.clone(),
        }
    }
}
