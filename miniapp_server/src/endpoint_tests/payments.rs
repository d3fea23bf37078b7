use actix_web::{
    cookie::{time::Duration, SameSite},
    http::StatusCode,
    web,
    web::ServiceConfig,
};
use serde_json::json;
use worldcoin_tools::{DevPortalApiError, TransactionRecord};

use super::{
    helpers::{nonce_cookie, post_request, test_options},
    mocks::MockDevPortal,
};
use crate::{
    config::ServerOptions,
    data_objects::{
        INVALID_PAYLOAD_ERROR,
        MISCONFIGURATION_ERROR,
        NO_REFERENCE_ERROR,
        PAYMENT_NONCE_COOKIE,
        PROVIDER_ERROR,
        REFERENCE_MISMATCH_ERROR,
        SERVER_ERROR,
    },
    routes::{confirm_payment, initiate_payment},
};

const REFERENCE: &str = "4ed4ca27cee14587901bb9ae63f06686";

fn record(reference: &str, status: &str) -> TransactionRecord {
    TransactionRecord {
        transaction_id: "tx1".to_string(),
        reference: reference.to_string(),
        status: status.to_string(),
        transaction_hash: None,
        from: None,
        updated_at: None,
    }
}

fn success_payload() -> serde_json::Value {
    json!({"payload": {"status": "success", "transaction_id": "tx1"}})
}

//----------------------------------------------   Initiate  ----------------------------------------------------

fn configure_initiate(cfg: &mut ServiceConfig) {
    cfg.app_data(web::Data::new(test_options()))
        .service(web::resource("/initiate-payment").route(web::post().to(initiate_payment)));
}

#[actix_web::test]
async fn initiate_issues_reference_and_nonce_cookie() {
    let _ = env_logger::try_init().ok();
    let (status, cookies, body) = post_request("/initiate-payment", None, None, configure_initiate).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().expect("response body did not contain an id");
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    let nonce = cookies.iter().find(|c| c.name() == PAYMENT_NONCE_COOKIE).expect("payment-nonce cookie was not set");
    assert_eq!(nonce.value(), id);
    assert_eq!(nonce.path(), Some("/"));
    assert_eq!(nonce.http_only(), Some(false));
    assert_eq!(nonce.same_site(), Some(SameSite::Lax));
    assert_eq!(nonce.max_age(), Some(Duration::seconds(600)));
    // Test deployments run over plain http
    assert_eq!(nonce.secure(), Some(false));
}

#[actix_web::test]
async fn each_initiate_call_issues_a_fresh_reference() {
    let _ = env_logger::try_init().ok();
    let (_, _, first) = post_request("/initiate-payment", None, None, configure_initiate).await;
    let (_, _, second) = post_request("/initiate-payment", None, None, configure_initiate).await;
    assert_ne!(first["id"], second["id"]);
}

//----------------------------------------------   Confirm  ----------------------------------------------------

// A portal mock with no expectations: any call to it panics, proving that the validation
// short-circuits before the provider is contacted.
fn configure_untouched_portal(cfg: &mut ServiceConfig) {
    let portal = MockDevPortal::new();
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_unconfigured_deployment(cfg: &mut ServiceConfig) {
    let portal = MockDevPortal::new();
    let options = ServerOptions { provider_configured: false, ..test_options() };
    cfg.app_data(web::Data::new(options))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_mined(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal.expect_fetch_transaction().returning(|_| Ok(record(REFERENCE, "mined")));
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_pending(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal.expect_fetch_transaction().returning(|_| Ok(record(REFERENCE, "pending")));
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_failed(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal.expect_fetch_transaction().returning(|_| Ok(record(REFERENCE, "failed")));
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_foreign_reference(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal.expect_fetch_transaction().returning(|_| Ok(record("someone-elses-reference", "mined")));
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_portal_error(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal.expect_fetch_transaction().returning(|_| {
        Err(DevPortalApiError::QueryError { status: 500, message: "portal is down".to_string() })
    });
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

fn configure_transport_fault(cfg: &mut ServiceConfig) {
    let mut portal = MockDevPortal::new();
    portal
        .expect_fetch_transaction()
        .returning(|_| Err(DevPortalApiError::ResponseError("connection reset".to_string())));
    cfg.app_data(web::Data::new(test_options()))
        .app_data(web::Data::new(portal))
        .service(web::resource("/confirm-payment").route(web::post().to(confirm_payment::<MockDevPortal>)));
}

#[actix_web::test]
async fn confirm_without_any_reference_fails_fast() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) = post_request("/confirm-payment", Some(success_payload()), None, configure_untouched_portal).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(NO_REFERENCE_ERROR));
}

#[actix_web::test]
async fn confirm_without_transaction_id_fails_fast() {
    let _ = env_logger::try_init().ok();
    let payload = json!({"payload": {"status": "success"}});
    let (status, _, body) =
        post_request("/confirm-payment", Some(payload), Some(nonce_cookie(REFERENCE)), configure_untouched_portal)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(INVALID_PAYLOAD_ERROR));
}

#[actix_web::test]
async fn confirm_with_empty_transaction_id_fails_fast() {
    let _ = env_logger::try_init().ok();
    let payload = json!({"payload": {"status": "success", "transaction_id": ""}});
    let (_, _, body) =
        post_request("/confirm-payment", Some(payload), Some(nonce_cookie(REFERENCE)), configure_untouched_portal)
            .await;
    assert_eq!(body["error"], json!(INVALID_PAYLOAD_ERROR));
}

#[actix_web::test]
async fn confirm_reports_missing_deployment_configuration() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) = post_request(
        "/confirm-payment",
        Some(success_payload()),
        Some(nonce_cookie(REFERENCE)),
        configure_unconfigured_deployment,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(MISCONFIGURATION_ERROR));
}

#[actix_web::test]
async fn confirm_accepts_mined_transaction_with_matching_reference() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) =
        post_request("/confirm-payment", Some(success_payload()), Some(nonce_cookie(REFERENCE)), configure_mined)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn confirm_is_idempotent_for_unchanged_inputs() {
    let _ = env_logger::try_init().ok();
    let (_, _, first) =
        post_request("/confirm-payment", Some(success_payload()), Some(nonce_cookie(REFERENCE)), configure_mined)
            .await;
    let (_, _, second) =
        post_request("/confirm-payment", Some(success_payload()), Some(nonce_cookie(REFERENCE)), configure_mined)
            .await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn body_reference_takes_precedence_over_cookie() {
    let _ = env_logger::try_init().ok();
    let payload = json!({
        "payload": {"status": "success", "transaction_id": "tx1"},
        "reference": REFERENCE,
    });
    // The cookie carries a stale value; the body echo matches the ledger record.
    let (_, _, body) =
        post_request("/confirm-payment", Some(payload), Some(nonce_cookie("stale-reference")), configure_mined).await;
    assert_eq!(body["success"], json!(true));
}

#[actix_web::test]
async fn mined_transaction_with_foreign_reference_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) = post_request(
        "/confirm-payment",
        Some(success_payload()),
        Some(nonce_cookie(REFERENCE)),
        configure_foreign_reference,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(REFERENCE_MISMATCH_ERROR));
}

#[actix_web::test]
async fn pending_transaction_echoes_provider_status() {
    let _ = env_logger::try_init().ok();
    let (_, _, body) =
        post_request("/confirm-payment", Some(success_payload()), Some(nonce_cookie(REFERENCE)), configure_pending)
            .await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("pending"));
}

#[actix_web::test]
async fn failed_transaction_echoes_provider_status() {
    let _ = env_logger::try_init().ok();
    let (_, _, body) =
        post_request("/confirm-payment", Some(success_payload()), Some(nonce_cookie(REFERENCE)), configure_failed)
            .await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("failed"));
}

#[actix_web::test]
async fn portal_errors_are_reported_as_upstream_failures() {
    let _ = env_logger::try_init().ok();
    let (status, _, body) = post_request(
        "/confirm-payment",
        Some(success_payload()),
        Some(nonce_cookie(REFERENCE)),
        configure_portal_error,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(PROVIDER_ERROR));
}

#[actix_web::test]
async fn transport_faults_are_reported_as_server_errors() {
    let _ = env_logger::try_init().ok();
    let (_, _, body) = post_request(
        "/confirm-payment",
        Some(success_payload()),
        Some(nonce_cookie(REFERENCE)),
        configure_transport_fault,
    )
    .await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(SERVER_ERROR));
}
