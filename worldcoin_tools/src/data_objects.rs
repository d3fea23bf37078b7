use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single terminal settlement status that counts as a successful payment. Every other status,
/// including pending ones, is a non-success outcome.
pub const MINED_STATUS: &str = "mined";

/// Error code the cloud verifier returns when the same proof has been accepted before. Treated as a
/// valid outcome so that replayed verification requests stay idempotent.
pub const ALREADY_VERIFIED_CODE: &str = "already_verified";

/// Authoritative transaction state as reported by the developer portal's ledger query API. Never
/// cached; fetched fresh for every confirmation call.
///
/// `status` is kept as a plain string so the provider's own value can be echoed verbatim in
/// diagnostics, whatever states the portal grows in future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(alias = "transaction_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The zero-knowledge credential a user presents to assert unique personhood. Opaque to this crate;
/// the cloud verifier does all the cryptography.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofPayload {
    pub proof: String,
    pub merkle_root: String,
    pub nullifier_hash: String,
    pub verification_level: VerificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationLevel {
    Orb,
    Device,
}

/// Outcome of a cloud proof verification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Not every portal response carries an explicit success flag; the API layer sets it from the
    /// HTTP status when absent.
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl VerifyResult {
    /// A proof is accepted when verification succeeded, or when the verifier reports that this exact
    /// proof was already accepted earlier.
    pub fn is_valid(&self) -> bool {
        self.success || self.code.as_deref() == Some(ALREADY_VERIFIED_CODE)
    }
}
