//! Mock Upstreams
//!
//! Deterministic fixtures for every retail domain. Used for local runs and
//! tests where no real CRM, catalog or carrier system is available. Writes
//! are echoed back and deletes always succeed.

use crate::domain::ports::Upstream;
use crate::domain::value_objects::{Options, Query, Record};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

fn records(values: impl IntoIterator<Item = Value>) -> Vec<Record> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

fn field<'a>(query: &'a Query, name: &str, fallback: &'a str) -> &'a str {
    query.get_str(name).unwrap_or(fallback)
}

macro_rules! mock_upstream {
    ($(#[$meta:meta])* $name:ident, $label:literal, |$query:ident| $fixture:block) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            fn fixture($query: &Query) -> Vec<Record> $fixture
        }

        #[async_trait]
        impl Upstream for $name {
            fn name(&self) -> &str {
                $label
            }

            async fn connect(&self, _options: &Options) -> anyhow::Result<()> {
                Ok(())
            }

            async fn fetch(&self, query: &Query) -> anyhow::Result<Vec<Record>> {
                Ok(Self::fixture(query))
            }

            async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
                Ok(Some(payload.clone()))
            }

            async fn delete(&self, _id: &str) -> anyhow::Result<bool> {
                Ok(true)
            }
        }
    };
}

mock_upstream!(
    /// One contact linked to account `a1`, with a single email interaction.
    MockCrmUpstream, "mock-crm", |query| {
        match query.get_str("entity") {
            Some("contact") => records([json!({
                "contact_id": field(query, "id", "c1"),
                "account_id": "a1",
                "email": "c1@example.com",
            })]),
            Some("account") => records([json!({
                "account_id": field(query, "id", "a1"),
                "name": "Mock Account",
            })]),
            Some("interaction") => records([json!({
                "interaction_id": "i1",
                "contact_id": field(query, "contact_id", "c1"),
                "channel": "email",
                "occurred_at": Utc::now().to_rfc3339(),
            })]),
            _ => Vec::new(),
        }
    }
);

mock_upstream!(
    /// A single product plus two related items.
    MockProductUpstream, "mock-product", |query| {
        match query.get_str("entity") {
            Some("product") => records([json!({
                "sku": field(query, "sku", "SKU-1"),
                "name": "Mock Product",
                "price": 10.0,
                "currency": "USD",
            })]),
            Some("related") => records([
                json!({"sku": "SKU-REL-1", "name": "Mock Related A", "price": 8.0, "currency": "USD"}),
                json!({"sku": "SKU-REL-2", "name": "Mock Related B", "price": 12.0, "currency": "USD"}),
            ]),
            _ => Vec::new(),
        }
    }
);

mock_upstream!(
    /// A promotional and a regular offer for any SKU.
    MockPricingUpstream, "mock-pricing", |query| {
        let sku = field(query, "sku", "SKU-1");
        match query.get_str("entity") {
            Some("price") => records([
                json!({"sku": sku, "currency": "USD", "amount": 9.5, "promotional": true}),
                json!({"sku": sku, "currency": "USD", "amount": 10.0, "promotional": false}),
            ]),
            _ => Vec::new(),
        }
    }
);

mock_upstream!(
    /// Five units available, split over two warehouses.
    MockInventoryUpstream, "mock-inventory", |query| {
        let sku = field(query, "sku", "SKU-1");
        match query.get_str("entity") {
            Some("inventory") => records([json!({"sku": sku, "available": 5, "reserved": 0})]),
            Some("warehouse_stock") => records([
                json!({"sku": sku, "warehouse_id": "W1", "available": 3}),
                json!({"sku": sku, "warehouse_id": "W2", "available": 2}),
            ]),
            _ => Vec::new(),
        }
    }
);

mock_upstream!(
    /// An in-transit shipment with pickup and in-transit scans.
    MockLogisticsUpstream, "mock-logistics", |query| {
        match query.get_str("entity") {
            Some("shipment") => records([json!({
                "tracking_id": field(query, "tracking_id", "T1"),
                "status": "in_transit",
                "origin": "Origin",
                "destination": "Destination",
            })]),
            Some("events") => {
                let now = Utc::now().to_rfc3339();
                records([
                    json!({"code": "PU", "occurred_at": now}),
                    json!({"code": "IT", "occurred_at": now}),
                ])
            }
            _ => Vec::new(),
        }
    }
);

mock_upstream!(
    /// View and click stages for any campaign.
    MockFunnelUpstream, "mock-funnel", |query| {
        match query.get_str("entity") {
            Some("funnel") => records([
                json!({"stage": "view", "count": 100}),
                json!({"stage": "click", "count": 25}),
            ]),
            _ => Vec::new(),
        }
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_crm_contact_echoes_id() {
        let query = Query::new().with("entity", "contact").with("id", "c-42");
        let records = MockCrmUpstream.fetch(&query).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["contact_id"], "c-42");
        assert_eq!(records[0]["account_id"], "a1");
    }

    #[tokio::test]
    async fn test_product_defaults_sku() {
        let query = Query::new().with("entity", "product");
        let records = MockProductUpstream.fetch(&query).await.unwrap();
        assert_eq!(records[0]["sku"], "SKU-1");
    }

    #[tokio::test]
    async fn test_unknown_entity_is_empty() {
        let query = Query::new().with("entity", "nope");
        assert!(MockFunnelUpstream.fetch(&query).await.unwrap().is_empty());
        assert!(MockPricingUpstream.fetch(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_are_echoed() {
        let payload = json!({"sku": "SKU-9"}).as_object().cloned().unwrap();
        let stored = MockInventoryUpstream.upsert(&payload).await.unwrap();
        assert_eq!(stored, Some(payload));
        assert!(MockLogisticsUpstream.delete("T1").await.unwrap());
    }

    #[test]
    fn test_names() {
        assert_eq!(MockCrmUpstream.name(), "mock-crm");
        assert_eq!(MockFunnelUpstream.name(), "mock-funnel");
    }
}
