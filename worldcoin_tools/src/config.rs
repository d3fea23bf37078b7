use log::*;
use wmp_common::Secret;

pub const DEFAULT_API_URL: &str = "https://developer.worldcoin.org";

/// Connection details for the Worldcoin Developer Portal API.
///
/// `app_id` and `api_key` default to empty values when their environment variables are missing so that
/// the server can still start (and report "Server misconfiguration" on the confirm path) rather than
/// crash at boot.
#[derive(Debug, Clone)]
pub struct DevPortalConfig {
    /// Base url of the developer portal, e.g. "https://developer.worldcoin.org". Override it to point
    /// payment confirmation at a staging portal or a local stub.
    pub base_url: String,
    /// The application identifier issued by the developer portal, in `app_<string>` format.
    pub app_id: String,
    /// Bearer credential for the transaction-status API.
    pub api_key: Secret<String>,
}

impl Default for DevPortalConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_URL.to_string(), app_id: String::default(), api_key: Secret::default() }
    }
}

impl DevPortalConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("WORLDCOIN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let app_id = std::env::var("APP_ID").unwrap_or_else(|_| {
            warn!("APP_ID is not set. Payment confirmation and proof verification will be disabled.");
            String::default()
        });
        let api_key = Secret::new(std::env::var("DEV_PORTAL_API_KEY").unwrap_or_else(|_| {
            warn!("DEV_PORTAL_API_KEY is not set. Payment confirmation will be disabled.");
            String::default()
        }));
        Self { base_url, app_id, api_key }
    }

    pub fn has_app_id(&self) -> bool {
        !self.app_id.is_empty()
    }

    /// True when both the application id and the portal credential are available, i.e. the transaction
    /// status API can be queried.
    pub fn is_configured(&self) -> bool {
        self.has_app_id() && self.api_key.is_provided()
    }
}
