//! retail-adapters - composition root
//!
//! Wires the mock upstreams into resilient adapters and domain connectors,
//! then builds one context per domain and logs it.

use retail_adapters::adapters::outbound::{
    MockCrmUpstream, MockFunnelUpstream, MockInventoryUpstream, MockLogisticsUpstream, MockPricingUpstream,
    MockProductUpstream,
};
use retail_adapters::application::connectors::crm::DEFAULT_INTERACTION_LIMIT;
use retail_adapters::application::connectors::funnel::DEFAULT_METRIC_LIMIT;
use retail_adapters::application::connectors::logistics::DEFAULT_EVENT_LIMIT;
use retail_adapters::application::connectors::product::DEFAULT_RELATED_LIMIT;
use retail_adapters::{
    load_config, Adapter, AdapterConfig, Connector, ConnectorConfig, CrmConnector, FunnelConnector,
    InventoryConnector, LogisticsConnector, Options, PricingConnector, ProductConnector, ResilientAdapter, Upstream,
};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

fn connector<U: Upstream + 'static>(upstream: U, adapter: &AdapterConfig, connector: &ConnectorConfig) -> Connector {
    let adapter: Arc<dyn Adapter> = Arc::new(ResilientAdapter::new(upstream, adapter.clone()));
    Connector::new(Some(adapter), connector.clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting retail-adapters max_calls={} per={:?} cache_ttl={:?} retries={}",
        cfg.adapter.max_calls,
        cfg.adapter.per_seconds,
        cfg.adapter.cache_ttl,
        cfg.adapter.retries
    );

    // ===== COMPOSITION ROOT =====
    let (a, c) = (&cfg.adapter, &cfg.connector);
    let crm = CrmConnector::new(connector(MockCrmUpstream, a, c));
    let products = ProductConnector::new(connector(MockProductUpstream, a, c));
    let pricing = PricingConnector::new(connector(MockPricingUpstream, a, c));
    let inventory = InventoryConnector::new(connector(MockInventoryUpstream, a, c));
    let logistics = LogisticsConnector::new(connector(MockLogisticsUpstream, a, c));
    let funnel = FunnelConnector::new(connector(MockFunnelUpstream, a, c));

    crm.connector().connect(&Options::new()).await?;

    let contact = crm
        .build_contact_context("c1", DEFAULT_INTERACTION_LIMIT)
        .await?;
    tracing::info!("crm context: {}", serde_json::to_string(&contact)?);

    let product = products
        .build_product_context("SKU-1", DEFAULT_RELATED_LIMIT)
        .await?;
    tracing::info!("product context: {}", serde_json::to_string(&product)?);

    let price = pricing.build_price_context("SKU-1").await?;
    tracing::info!("price context: {}", serde_json::to_string(&price)?);

    let stock = inventory.build_inventory_context("SKU-1").await?;
    tracing::info!("inventory context: {}", serde_json::to_string(&stock)?);

    let shipment = logistics
        .build_logistics_context("T1", DEFAULT_EVENT_LIMIT)
        .await?;
    tracing::info!("logistics context: {}", serde_json::to_string(&shipment)?);

    let conversions = funnel
        .build_funnel_context(Some("cmp-1"), None, DEFAULT_METRIC_LIMIT)
        .await?;
    tracing::info!("funnel context: {}", serde_json::to_string(&conversions)?);

    tracing::info!("all contexts built");
    Ok(())
}
