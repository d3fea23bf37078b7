use anyhow::{anyhow, Result};
use log::*;
use url::Url;
use wmp_common::{Token, TokenAmount};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8360";
const DEFAULT_AMOUNT_SPEC: &str = "WLD:0.5,USDCE:0.1";
const DEFAULT_DESCRIPTION: &str = "Mini-app payment";

/// Everything the payment initiator needs to build a payment request. The recipient address and the
/// token amounts are configuration, not code constants, so a deployment can change them without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct ClientProfile {
    pub server: Url,
    pub recipient: String,
    pub transfers: Vec<(Token, TokenAmount)>,
    pub description: String,
}

impl ClientProfile {
    pub fn from_env_or_default() -> Self {
        let server = std::env::var("WMP_SERVER_URL")
            .ok()
            .and_then(|s| {
                Url::parse(&s)
                    .map_err(|e| warn!("Ignoring invalid WMP_SERVER_URL ({s}): {e}"))
                    .ok()
            })
            .unwrap_or_else(|| Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid"));
        let recipient = std::env::var("WMP_PAYMENT_RECIPIENT").unwrap_or_else(|_| {
            warn!("WMP_PAYMENT_RECIPIENT is not set. Payments cannot be addressed.");
            String::default()
        });
        let transfers = std::env::var("WMP_PAYMENT_AMOUNTS")
            .ok()
            .and_then(|s| {
                parse_amount_spec(&s)
                    .map_err(|e| warn!("Ignoring invalid WMP_PAYMENT_AMOUNTS ({s}): {e}"))
                    .ok()
            })
            .unwrap_or_else(|| parse_amount_spec(DEFAULT_AMOUNT_SPEC).expect("default amount spec is valid"));
        let description =
            std::env::var("WMP_PAYMENT_DESCRIPTION").unwrap_or_else(|_| DEFAULT_DESCRIPTION.to_string());
        Self { server, recipient, transfers, description }
    }
}

/// Parses a comma-separated list of `SYMBOL:whole_amount` pairs, e.g. `WLD:0.5,USDCE:0.1`, into
/// smallest-unit token amounts.
pub fn parse_amount_spec(spec: &str) -> Result<Vec<(Token, TokenAmount)>> {
    spec.split(',')
        .map(|pair| {
            let (symbol, amount) =
                pair.split_once(':').ok_or_else(|| anyhow!("'{pair}' is not in SYMBOL:amount form"))?;
            let token = symbol.trim().parse::<Token>().map_err(|e| anyhow!("{e}"))?;
            let amount = amount.trim().parse::<f64>().map_err(|e| anyhow!("Invalid amount in '{pair}': {e}"))?;
            let amount = token.to_base_units(amount).map_err(|e| anyhow!("{e}"))?;
            Ok((token, amount))
        })
        .collect()
}
