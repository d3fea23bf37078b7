mod api;
mod config;
mod error;

mod data_objects;

pub use api::{DevPortalApi, ProofVerification, TransactionQuery};
pub use config::DevPortalConfig;
pub use data_objects::{
    ProofPayload,
    TransactionRecord,
    VerificationLevel,
    VerifyResult,
    ALREADY_VERIFIED_CODE,
    MINED_STATUS,
};
pub use error::DevPortalApiError;
