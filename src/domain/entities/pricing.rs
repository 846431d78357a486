//! Pricing entities.

use crate::domain::schema::{lenient, lenient_opt, non_empty, Schema};
use crate::domain::value_objects::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One price offer for a SKU in a given channel or region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    #[serde(deserialize_with = "non_empty")]
    pub sku: String,
    pub currency: String,
    #[serde(deserialize_with = "lenient")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub list_amount: Option<f64>,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tax_included: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub promotional: bool,
    #[serde(default)]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub effective_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for PriceEntry {
    const NAME: &'static str = "PriceEntry";
}

/// All offers for a SKU plus the one currently in force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceContext {
    pub sku: String,
    pub active: Option<PriceEntry>,
    pub offers: Vec<PriceEntry>,
}

impl PriceContext {
    /// Build a context, picking the lowest amount as the active offer.
    pub fn from_offers(sku: impl Into<String>, offers: Vec<PriceEntry>) -> Self {
        let active = offers
            .iter()
            .min_by(|a, b| a.amount.total_cmp(&b.amount))
            .cloned();
        Self {
            sku: sku.into(),
            active,
            offers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(amount: serde_json::Value, promotional: bool) -> PriceEntry {
        let record = json!({
            "sku": "SKU-1",
            "currency": "USD",
            "amount": amount,
            "promotional": promotional
        });
        PriceEntry::from_record(record.as_object().cloned().unwrap()).unwrap()
    }

    #[test]
    fn test_active_is_lowest_amount() {
        let ctx = PriceContext::from_offers("SKU-1", vec![entry(json!(10.0), false), entry(json!("9.5"), true)]);
        let active = ctx.active.unwrap();
        assert_eq!(active.amount, 9.5);
        assert!(active.promotional);
        assert_eq!(ctx.offers.len(), 2);
    }

    #[test]
    fn test_no_offers_no_active() {
        let ctx = PriceContext::from_offers("SKU-1", Vec::new());
        assert!(ctx.active.is_none());
    }

    #[test]
    fn test_amount_required() {
        let record = json!({"sku": "SKU-1", "currency": "USD"});
        assert!(PriceEntry::from_record(record.as_object().cloned().unwrap()).is_err());
    }
}
