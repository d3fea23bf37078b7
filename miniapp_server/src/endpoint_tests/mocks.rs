use mockall::mock;
use worldcoin_tools::{
    DevPortalApiError,
    ProofPayload,
    ProofVerification,
    TransactionQuery,
    TransactionRecord,
    VerifyResult,
};

mock! {
    pub DevPortal {}
    impl TransactionQuery for DevPortal {
        async fn fetch_transaction(&self, transaction_id: &str) -> Result<TransactionRecord, DevPortalApiError>;
    }
    impl ProofVerification for DevPortal {
        async fn verify_proof<'a>(&self, payload: &ProofPayload, action: &str, signal: Option<&'a str>) -> Result<VerifyResult, DevPortalApiError>;
    }
}
