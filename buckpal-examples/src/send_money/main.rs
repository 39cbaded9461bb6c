//! Send-money example application
//!
//! This example demonstrates the transfer core with:
//! - Opening accounts in the in-memory store
//! - A successful transfer and its receipt
//! - A transfer refused for insufficient funds
//! - Balance queries after each step
//!
//! Run with `RUST_LOG=buckpal=debug` to watch the transfer phases.

use anyhow::Result;
use buckpal::{AccountId, Money, TransferConfig};
use buckpal_examples::send_money::DemoBank;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting send-money example");

    let bank = DemoBank::new(TransferConfig::default());

    let alice = AccountId::try_new(1)?;
    let bob = AccountId::try_new(2)?;

    info!("Opening Alice's account with 1000.00");
    bank.open_account(alice, Money::of(100_000));
    info!("Opening Bob's account with 500.00");
    bank.open_account(bob, Money::of(50_000));

    info!("Transferring 200.00 from Alice to Bob");
    let receipt = bank.send_money(alice, bob, Money::of(20_000)).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    info!("Transferring 5000.00 from Bob to Alice");
    match bank.send_money(bob, alice, Money::of(500_000)).await {
        Ok(_) => warn!("overdraft transfer unexpectedly committed"),
        Err(error) => info!(%error, "transfer refused"),
    }

    for (name, account) in [("Alice", alice), ("Bob", bob)] {
        let balance = bank.balance(account).await?;
        println!("{name}: {balance}");
    }

    Ok(())
}
