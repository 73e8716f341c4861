use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use setrs::{
    TokenFlow,
    chain::{
        bidder::{Bidder, BidderKind},
        cache::ContractCache,
        provider::{ProviderCaller, ProviderSubmitter},
    },
    config::SdkConfig,
};
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

type DynProvider = dyn Provider + Send + Sync;

const USAGE: &str =
    "usage: setrs <config.json> <rebalancing-set> <quantity> [standard|ctoken|ether]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [config_path, rebalancing_set, quantity, rest @ ..] = args.as_slice() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let kind = match rest.first().map(String::as_str) {
        None | Some("standard") => BidderKind::Standard,
        Some("ctoken") => BidderKind::CToken,
        Some("ether") => BidderKind::Ether,
        Some(other) => {
            eprintln!("unknown bidder kind {other}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = SdkConfig::from_file(config_path)?;
    let rebalancing_set = Address::from_str(rebalancing_set)?;
    let quantity = U256::from_str(quantity)?;

    tracing::info!(
        rpc = %config.rpc_url,
        ?rebalancing_set,
        %quantity,
        ?kind,
        "computing bid flows"
    );

    let provider = ProviderBuilder::new().connect_http(config.rpc_url.clone());
    let provider_arc: Arc<DynProvider> = Arc::new(provider);

    let capacity = NonZeroUsize::new(config.contract_cache_size)
        .ok_or("contractCacheSize must be positive")?;
    let bidder = Bidder::from_config(
        kind,
        &config,
        Arc::new(ProviderCaller::new(provider_arc.clone())),
        Arc::new(ProviderSubmitter::new(provider_arc)),
        Arc::new(ContractCache::new(capacity)),
    );

    let snapshot = bidder.snapshot(rebalancing_set, None).await?;
    bidder.verify_underlyings(Some(snapshot.block)).await?;
    let price = snapshot.calculator().bid_price(&snapshot.price_state)?;
    let flows = snapshot.token_flows(quantity)?;

    println!(
        "block {} | price {}/{} | elapsed {}s",
        snapshot.block,
        price.numerator,
        price.denominator,
        snapshot.price_state.elapsed_time
    );
    for (i, token) in flows.tokens.iter().enumerate() {
        match flows.flow_at(i) {
            Some(TokenFlow::Inflow(amount)) => println!("  {token}  pay     {amount}"),
            Some(TokenFlow::Outflow(amount)) => println!("  {token}  receive {amount}"),
            Some(TokenFlow::Neutral) | None => println!("  {token}  -"),
        }
    }
    Ok(())
}
