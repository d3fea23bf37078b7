use std::fmt::Display;

use serde::{Deserialize, Serialize};
use worldcoin_tools::{ProofPayload, VerifyResult};

/// Name of the cookie that carries the payment reference between the initiate and confirm calls.
/// Deliberately not HTTP-only: the wallet host's webview must be able to send it back with the
/// confirmation fetch.
pub const PAYMENT_NONCE_COOKIE: &str = "payment-nonce";

/// Lifetime of the payment-nonce cookie. A confirmation arriving after this window fails the
/// reference check, which is the intended way stale attempts die.
pub const PAYMENT_NONCE_MAX_AGE_SECS: i64 = 600;

// Diagnostic strings returned to the client. The confirm endpoint always answers 200 with a
// success flag; these distinguish user errors, deployment errors and upstream errors.
pub const NO_REFERENCE_ERROR: &str = "No reference found";
pub const INVALID_PAYLOAD_ERROR: &str = "Invalid payload";
pub const MISCONFIGURATION_ERROR: &str = "Server misconfiguration";
pub const PROVIDER_ERROR: &str = "Worldcoin API error";
pub const REFERENCE_MISMATCH_ERROR: &str = "Reference mismatch";
pub const SERVER_ERROR: &str = "Server error";
pub const INTERNAL_ERROR: &str = "internal_error";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReferenceResult {
    pub id: String,
}

/// The outcome the wallet host reports after the user approves, rejects or fails the transfer.
/// Ephemeral; it only exists for the duration of one confirm call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalPayload {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl FinalPayload {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentParams {
    pub payload: FinalPayload,
    /// Optional echo of the reference. When present it takes precedence over the cookie value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPaymentResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfirmPaymentResult {
    pub fn confirmed() -> Self {
        Self { success: true, error: None }
    }

    pub fn failure<S: Display>(reason: S) -> Self {
        Self { success: false, error: Some(reason.to_string()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProofParams {
    pub payload: ProofPayload,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProofResult {
    pub success: bool,
    #[serde(rename = "verifyRes", default, skip_serializing_if = "Option::is_none")]
    pub verify_res: Option<VerifyResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyProofResult {
    pub fn valid(res: VerifyResult) -> Self {
        Self { success: true, verify_res: Some(res), error: None }
    }

    pub fn invalid(res: VerifyResult) -> Self {
        Self { success: false, verify_res: Some(res), error: None }
    }

    pub fn error<S: Display>(reason: S) -> Self {
        Self { success: false, verify_res: None, error: Some(reason.to_string()) }
    }
}
