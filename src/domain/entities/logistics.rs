//! Shipment tracking entities.

use crate::domain::schema::{lenient_opt, non_empty, Schema};
use crate::domain::value_objects::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(deserialize_with = "non_empty")]
    pub tracking_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    pub status: String,
    #[serde(default)]
    pub eta: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub service_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for Shipment {
    const NAME: &'static str = "Shipment";
}

/// A carrier scan or status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentEvent {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub metadata: Record,
}

impl Schema for ShipmentEvent {
    const NAME: &'static str = "ShipmentEvent";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsContext {
    pub shipment: Shipment,
    pub events: Vec<ShipmentEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shipment_weight_coercion() {
        let record = json!({"tracking_id": "T1", "status": "in_transit", "weight_kg": "2.5"});
        let shipment = Shipment::from_record(record.as_object().cloned().unwrap()).unwrap();
        assert_eq!(shipment.weight_kg, Some(2.5));
        assert!(shipment.eta.is_none());
    }

    #[test]
    fn test_event_requires_timestamp() {
        let record = json!({"code": "PU"});
        let err = ShipmentEvent::from_record(record.as_object().cloned().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid payload for ShipmentEvent");
    }
}
