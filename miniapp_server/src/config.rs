use std::env;

use log::*;
use worldcoin_tools::DevPortalConfig;

const DEFAULT_WMP_HOST: &str = "127.0.0.1";
const DEFAULT_WMP_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// If false, the `payment-nonce` cookie is issued without the `Secure` attribute so the flow works
    /// over plain http in local development. Leave it on in production.
    pub secure_cookies: bool,
    /// Developer portal connection details (application id, API credential, base url).
    pub dev_portal: DevPortalConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WMP_HOST.to_string(),
            port: DEFAULT_WMP_PORT,
            secure_cookies: true,
            dev_portal: DevPortalConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WMP_HOST").ok().unwrap_or_else(|| DEFAULT_WMP_HOST.into());
        let port = env::var("WMP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WMP_PORT. {e} Using the default, {DEFAULT_WMP_PORT}, instead."
                    );
                    DEFAULT_WMP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WMP_PORT);
        let secure_cookies = env::var("WMP_SECURE_COOKIES").map(|s| &s != "0" && &s != "false").unwrap_or(true);
        if !secure_cookies {
            warn!("🪛️ Secure cookies are disabled. Do not run a production instance like this.");
        }
        let dev_portal = DevPortalConfig::new_from_env_or_default();
        if !dev_portal.is_configured() {
            warn!(
                "🪛️ The developer portal credentials are incomplete. Set APP_ID and DEV_PORTAL_API_KEY, or every \
                 payment confirmation will fail with a misconfiguration error."
            );
        }
        Self { host, port, secure_cookies, dev_portal }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that handlers need at request time. Generally we try to keep
/// this as small as possible, and exclude secrets to avoid passing sensitive information around the
/// system.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub secure_cookies: bool,
    /// True when both APP_ID and DEV_PORTAL_API_KEY are set, i.e. payments can be confirmed.
    pub provider_configured: bool,
    /// True when APP_ID is set, i.e. proofs can be verified.
    pub has_app_id: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            secure_cookies: config.secure_cookies,
            provider_configured: config.dev_portal.is_configured(),
            has_app_id: config.dev_portal.has_app_id(),
        }
    }
}
