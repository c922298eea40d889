//! Read-only account queries. No wallet is involved, so nothing is signed.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use serde_json::json;

use creditrust_app::{default_modules, CrediTrustApp};
use creditrust_core::{AccountAddress, CrediTrustConfig};
use creditrust_identity::MAX_SCORE;
use creditrust_ledger::RestLedger;

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Account address (0x-prefixed hex).
    #[arg(short, long)]
    pub address: String,
}

impl AddressArgs {
    fn parse(&self) -> anyhow::Result<AccountAddress> {
        AccountAddress::parse(&self.address)
            .with_context(|| format!("invalid account address '{}'", self.address))
    }
}

fn app(config: &CrediTrustConfig) -> CrediTrustApp {
    let ledger = Arc::new(RestLedger::new(config.network.node_url.clone()));
    CrediTrustApp::new(config.clone(), ledger, None)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn profile(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    let profile = app(config).ledger().user_profile(&address).await?;
    if profile.is_none() {
        tracing::info!(address = %address.short(), "account has no profile");
    }
    print_json(&profile)
}

pub async fn achievements(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    print_json(&app(config).ledger().achievements(&address).await?)
}

pub async fn activity(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    print_json(&app(config).ledger().activity(&address).await?)
}

pub async fn modules(config: &CrediTrustConfig) -> anyhow::Result<()> {
    let mut modules = app(config).ledger().learning_modules().await?;
    if modules.is_empty() {
        tracing::info!("contract publishes no learning modules; showing default catalogue");
        modules = default_modules();
    }
    print_json(&modules)
}

pub async fn balance(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    let balance = app(config).ledger().balance(&address).await?;
    print_json(&json!({
        "address": address,
        "octas": balance.octas(),
        "apt": balance.to_string(),
    }))
}

pub async fn score(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    let score = app(config).trust_score(&address).await;
    print_json(&json!({
        "address": address,
        "score": score.value(),
        "max": MAX_SCORE,
        "tier": score.tier(),
    }))
}

pub async fn dashboard(config: &CrediTrustConfig, args: &AddressArgs) -> anyhow::Result<()> {
    let address = args.parse()?;
    print_json(&app(config).dashboard().load(&address).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_args() {
        let args = AddressArgs {
            address: "0xa11ce".into(),
        };
        assert_eq!(args.parse().unwrap(), AccountAddress::parse("0xa11ce").unwrap());

        let bad = AddressArgs {
            address: "alice".into(),
        };
        let err = bad.parse().unwrap_err();
        assert!(err.to_string().contains("invalid account address 'alice'"));
    }
}
