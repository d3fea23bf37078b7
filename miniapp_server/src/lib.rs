//! # Mini-app payment server
//! This crate hosts the backend for a wallet-hosted mini-app. It is responsible for:
//! Issuing single-use payment references and persisting them in a short-lived cookie.
//! Confirming reported payments against the developer portal's authoritative transaction ledger.
//! Relaying identity proofs to the cloud verification service.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/initiate-payment`: Issues a fresh payment reference and sets the `payment-nonce` cookie.
//! * `/api/confirm-payment`: Cross-checks a reported payment outcome against the portal ledger.
//! * `/api/verify`: Relays a personhood proof to the cloud verifier.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
