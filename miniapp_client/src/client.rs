use anyhow::{anyhow, Result};
use log::debug;
use miniapp_server::data_objects::{ConfirmPaymentParams, ConfirmPaymentResult, FinalPayload, PaymentReferenceResult};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use url::Url;

use crate::profile::ClientProfile;

/// Thin HTTP client for the mini-app payment server. The cookie store is enabled so the
/// `payment-nonce` cookie set by the initiate call travels back with the confirm call, exactly as a
/// browser would send it.
pub struct PaymentServerClient {
    client: Client,
    server: Url,
}

impl PaymentServerClient {
    pub fn new(profile: &ClientProfile) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Mini-App Payment Client")
            .cookie_store(true)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, server: profile.server.clone() })
    }

    pub fn server(&self) -> &str {
        self.server.as_str()
    }

    pub async fn health(&self) -> Result<String> {
        let url = self.server.join("/health")?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Health check failed with status {}", response.status()));
        }
        Ok(response.text().await?.trim().to_string())
    }

    /// Asks the server for a fresh payment reference. The nonce cookie lands in the cookie store as a
    /// side effect.
    pub async fn initiate_payment(&self) -> Result<String> {
        let url = self.server.join("/api/initiate-payment")?;
        debug!("POST {url}");
        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Could not create a payment reference. Status {}", response.status()));
        }
        let result = response.json::<PaymentReferenceResult>().await?;
        Ok(result.id)
    }

    /// Reports the wallet's final payload to the server for authoritative confirmation.
    pub async fn confirm_payment(&self, payload: &FinalPayload) -> Result<ConfirmPaymentResult> {
        let url = self.server.join("/api/confirm-payment")?;
        debug!("POST {url}");
        let params = ConfirmPaymentParams { payload: payload.clone(), reference: None };
        let response = self.client.post(url).json(&params).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Confirm payment call failed with status {}", response.status()));
        }
        Ok(response.json::<ConfirmPaymentResult>().await?)
    }
}
