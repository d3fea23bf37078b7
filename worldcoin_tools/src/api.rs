use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::json;

use crate::{
    config::DevPortalConfig,
    data_objects::{ProofPayload, TransactionRecord, VerifyResult},
    DevPortalApiError,
};

/// Query interface for the developer portal's transaction-status ledger. The server's confirm handler
/// is generic over this trait so endpoint tests can substitute a mock portal.
#[allow(async_fn_in_trait)]
pub trait TransactionQuery {
    /// Fetches the authoritative record for a transaction. A non-2xx portal response maps to
    /// [`DevPortalApiError::QueryError`].
    async fn fetch_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, DevPortalApiError>;
}

/// Relay interface for cloud proof verification.
#[allow(async_fn_in_trait)]
pub trait ProofVerification {
    /// Submits an identity proof to the cloud verifier. A rejected proof is an `Ok` result with
    /// `success == false`; only transport-level faults produce an `Err`.
    async fn verify_proof(
        &self,
        payload: &ProofPayload,
        action: &str,
        signal: Option<&str>,
    ) -> Result<VerifyResult, DevPortalApiError>;
}

#[derive(Clone)]
pub struct DevPortalApi {
    config: DevPortalConfig,
    client: Arc<Client>,
}

impl DevPortalApi {
    pub fn new(config: DevPortalConfig) -> Result<Self, DevPortalApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DevPortalApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

impl TransactionQuery for DevPortalApi {
    async fn fetch_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, DevPortalApiError> {
        let url = self.url(&format!("/api/v2/minikit/transaction/{transaction_id}"));
        debug!("Fetching transaction {transaction_id}");
        let response = self
            .client
            .get(url)
            .query(&[("app_id", self.config.app_id.as_str())])
            .bearer_auth(self.config.api_key.reveal())
            .send()
            .await
            .map_err(|e| DevPortalApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Transaction query successful. {}", response.status());
            let record =
                response.json::<TransactionRecord>().await.map_err(|e| DevPortalApiError::JsonError(e.to_string()))?;
            info!("Fetched transaction {transaction_id}. Status: {}", record.status);
            Ok(record)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| DevPortalApiError::ResponseError(e.to_string()))?;
            Err(DevPortalApiError::QueryError { status, message })
        }
    }
}

impl ProofVerification for DevPortalApi {
    async fn verify_proof(
        &self,
        payload: &ProofPayload,
        action: &str,
        signal: Option<&str>,
    ) -> Result<VerifyResult, DevPortalApiError> {
        let url = self.url(&format!("/api/v2/verify/{}", self.config.app_id));
        let mut body = serde_json::to_value(payload).map_err(|e| DevPortalApiError::JsonError(e.to_string()))?;
        body["action"] = json!(action);
        if let Some(signal) = signal {
            body["signal"] = json!(signal);
        }
        trace!("Sending proof verification request for action {action}");
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DevPortalApiError::ResponseError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            // A 2xx response is an accepted proof, whatever the body carries.
            let mut result =
                response.json::<VerifyResult>().await.map_err(|e| DevPortalApiError::JsonError(e.to_string()))?;
            result.success = true;
            debug!("Proof for action {action} was accepted by the verifier");
            Ok(result)
        } else if status.is_client_error() {
            // Rejections come back as 4xx with a machine-readable code; they are outcomes, not faults.
            let mut result =
                response.json::<VerifyResult>().await.map_err(|e| DevPortalApiError::JsonError(e.to_string()))?;
            result.success = false;
            debug!("Proof for action {action} was rejected. Code: {:?}", result.code);
            Ok(result)
        } else {
            let message = response.text().await.map_err(|e| DevPortalApiError::ResponseError(e.to_string()))?;
            Err(DevPortalApiError::QueryError { status: status.as_u16(), message })
        }
    }
}
