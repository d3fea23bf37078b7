mod client;
mod initiator;
mod profile;
mod wallet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::info;

use crate::{
    client::PaymentServerClient,
    initiator::PaymentInitiator,
    profile::ClientProfile,
    wallet::ManualWallet,
};

#[derive(Parser)]
#[command(name = "wmptool", about = "Payment client for the mini-app payment server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full initiate → pay → confirm flow against the payment server
    Pay,
    /// Check that the payment server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();
    let profile = ClientProfile::from_env_or_default();
    match cli.command {
        Command::Pay => pay(profile).await,
        Command::Health => health(profile).await,
    }
}

async fn health(profile: ClientProfile) -> Result<()> {
    let client = PaymentServerClient::new(&profile)?;
    let response = client.health().await?;
    println!("{response}");
    Ok(())
}

async fn pay(profile: ClientProfile) -> Result<()> {
    let client = PaymentServerClient::new(&profile)?;
    // The wallet capability is resolved exactly once, before any payment attempt.
    let Some(wallet) = ManualWallet::resolve() else {
        println!("No wallet capability is available. Open this mini-app inside the wallet host to pay.");
        return Ok(());
    };
    let initiator = PaymentInitiator::new(profile, client, wallet);
    let Some(final_payload) = initiator.initiate_and_send_payment().await? else {
        println!("❌ The payment was cancelled or failed.");
        return Ok(());
    };
    if !final_payload.is_success() {
        println!("❌ The payment was cancelled or failed.");
        return Ok(());
    }
    info!("Wallet reported a successful transfer. Confirming with the server.");
    let confirmation = initiator.confirm_payment(&final_payload).await?;
    if confirmation.success {
        println!("✅ Payment confirmed.");
    } else {
        let reason = confirmation.error.unwrap_or_else(|| "unknown".to_string());
        println!("⚠️ The server could not confirm the payment: {reason}");
    }
    Ok(())
}
