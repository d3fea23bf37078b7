//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Every long, non-cpu-bound operation (the outbound developer portal calls in particular) is awaited,
//! so worker threads keep serving other requests while a confirmation is in flight.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    get,
    web,
    HttpRequest,
    HttpResponse,
    Responder,
};
use log::*;
use worldcoin_tools::{DevPortalApiError, ProofVerification, TransactionQuery, MINED_STATUS};

use crate::{
    config::ServerOptions,
    data_objects::{
        ConfirmPaymentParams,
        ConfirmPaymentResult,
        PaymentReferenceResult,
        VerifyProofParams,
        VerifyProofResult,
        INTERNAL_ERROR,
        INVALID_PAYLOAD_ERROR,
        MISCONFIGURATION_ERROR,
        NO_REFERENCE_ERROR,
        PAYMENT_NONCE_COOKIE,
        PAYMENT_NONCE_MAX_AGE_SECS,
        PROVIDER_ERROR,
        REFERENCE_MISMATCH_ERROR,
        SERVER_ERROR,
    },
    helpers::new_payment_reference,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//------------------------------------------   Initiate payment  ---------------------------------------------
/// Route handler for the initiate-payment endpoint
///
/// Issues a fresh single-use payment reference and stores it in the `payment-nonce` cookie. The
/// reference ties the client's payment attempt to its eventual confirmation: the wallet host tags the
/// transfer with it, and the confirm endpoint cross-checks the ledger record against the cookie value.
///
/// Re-initiating simply overwrites the cookie; only the most recently issued reference is live
/// (last-writer-wins), so a superseded in-flight attempt will fail the reference check on confirm.
pub async fn initiate_payment(opts: web::Data<ServerOptions>) -> HttpResponse {
    trace!("🪙️ Received initiate payment request");
    let id = new_payment_reference();
    let cookie = Cookie::build(PAYMENT_NONCE_COOKIE, id.clone())
        // The client must be able to read this cookie and send it back with the confirm call
        .http_only(false)
        .secure(opts.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(PAYMENT_NONCE_MAX_AGE_SECS))
        .finish();
    debug!("🪙️ Issued payment reference {id}");
    HttpResponse::Ok().cookie(cookie).json(PaymentReferenceResult { id })
}

//------------------------------------------   Confirm payment  ----------------------------------------------
/// Route handler for the confirm-payment endpoint
///
/// The client reports the wallet host's final payload here after a transfer attempt. The handler never
/// trusts that report: it re-derives the expected reference (body echo first, cookie otherwise) and
/// queries the developer portal's transaction ledger, which is the single source of truth. A payment is
/// confirmed iff the ledger record carries the expected reference AND its settlement status is the one
/// accepted terminal value (`mined`).
///
/// The response is always `200 {success, error?}`; validation failures, upstream errors and mismatches
/// are ordinary non-success results, not HTTP errors. There are no retries and no local memoization:
/// the ledger is queried fresh on every call, so repeating a confirm with unchanged inputs yields the
/// same answer.
pub async fn confirm_payment<C: TransactionQuery>(
    req: HttpRequest,
    body: web::Json<ConfirmPaymentParams>,
    opts: web::Data<ServerOptions>,
    api: web::Data<C>,
) -> HttpResponse {
    trace!("🪙️ Received confirm payment request");
    let ConfirmPaymentParams { payload, reference } = body.into_inner();
    let cookie_reference = req.cookie(PAYMENT_NONCE_COOKIE).map(|c| c.value().to_string());
    let Some(reference) = reference.or(cookie_reference) else {
        warn!("🪙️ No payment reference found in the request body or the nonce cookie");
        return HttpResponse::Ok().json(ConfirmPaymentResult::failure(NO_REFERENCE_ERROR));
    };
    let Some(transaction_id) = payload.transaction_id.filter(|id| !id.is_empty()) else {
        warn!("🪙️ Confirm payment payload did not contain a transaction id");
        return HttpResponse::Ok().json(ConfirmPaymentResult::failure(INVALID_PAYLOAD_ERROR));
    };
    if !opts.provider_configured {
        error!("🪙️ APP_ID or DEV_PORTAL_API_KEY is not set. Payments cannot be confirmed.");
        return HttpResponse::Ok().json(ConfirmPaymentResult::failure(MISCONFIGURATION_ERROR));
    }
    debug!("🪙️ Confirming transaction {transaction_id} against reference {reference}");
    let result = match api.fetch_transaction(&transaction_id).await {
        // Reference inequality short-circuits before any success determination
        Ok(record) if record.reference != reference => {
            warn!(
                "🪙️ Transaction {transaction_id} carries reference {}, which does not match the expected reference \
                 {reference}",
                record.reference
            );
            ConfirmPaymentResult::failure(REFERENCE_MISMATCH_ERROR)
        },
        Ok(record) if record.status == MINED_STATUS => {
            info!("🪙️ Payment {transaction_id} confirmed successfully");
            ConfirmPaymentResult::confirmed()
        },
        Ok(record) => {
            info!("🪙️ Transaction {transaction_id} has not settled. Status: {}", record.status);
            ConfirmPaymentResult::failure(record.status)
        },
        Err(DevPortalApiError::QueryError { status, message }) => {
            error!("🪙️ The developer portal returned an error for transaction {transaction_id}. {status}. {message}");
            ConfirmPaymentResult::failure(PROVIDER_ERROR)
        },
        Err(e) => {
            error!("🪙️ Unexpected error while confirming transaction {transaction_id}. {e}");
            ConfirmPaymentResult::failure(SERVER_ERROR)
        },
    };
    HttpResponse::Ok().json(result)
}

//------------------------------------------   Verify proof  -------------------------------------------------
/// Route handler for the verify endpoint
///
/// Forwards an identity proof to the cloud verification service and relays the outcome. The proof is
/// accepted when the verifier reports success, or when it reports that this exact proof was already
/// verified (so replayed requests stay idempotent). All cryptography happens upstream; this handler
/// only relays.
pub async fn verify_proof<C: ProofVerification>(
    body: web::Json<VerifyProofParams>,
    opts: web::Data<ServerOptions>,
    api: web::Data<C>,
) -> HttpResponse {
    trace!("🌐️ Received proof verification request");
    let VerifyProofParams { payload, action, signal } = body.into_inner();
    if !opts.has_app_id {
        error!("🌐️ APP_ID is not set. Proofs cannot be verified.");
        return HttpResponse::InternalServerError().json(VerifyProofResult::error(INTERNAL_ERROR));
    }
    match api.verify_proof(&payload, &action, signal.as_deref()).await {
        Ok(res) if res.is_valid() => {
            info!("🌐️ Proof for action {action} verified successfully");
            HttpResponse::Ok().json(VerifyProofResult::valid(res))
        },
        Ok(res) => {
            info!("🌐️ Proof for action {action} was rejected. Code: {:?}", res.code);
            HttpResponse::BadRequest().json(VerifyProofResult::invalid(res))
        },
        Err(e) => {
            error!("🌐️ Could not verify proof for action {action}. {e}");
            HttpResponse::InternalServerError().json(VerifyProofResult::error(INTERNAL_ERROR))
        },
    }
}
