//! Logistics Connector
//!
//! Shipment status plus the carrier's scan history.

use crate::application::connector::Connector;
use crate::domain::entities::{LogisticsContext, Shipment, ShipmentEvent};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

pub const DEFAULT_EVENT_LIMIT: usize = 50;

pub struct LogisticsConnector {
    connector: Connector,
}

impl LogisticsConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    pub async fn get_shipment(&self, tracking_id: &str) -> Result<Option<Shipment>, AdapterError> {
        let query = Query::new().with("entity", "shipment").with("tracking_id", tracking_id);
        let record = self.connector.fetch_first(&query).await?;
        self.connector.map_single(record)
    }

    pub async fn get_events(&self, tracking_id: &str, limit: usize) -> Result<Vec<ShipmentEvent>, AdapterError> {
        let query = Query::new()
            .with("entity", "events")
            .with("tracking_id", tracking_id)
            .with("limit", limit);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    pub async fn build_logistics_context(
        &self,
        tracking_id: &str,
        event_limit: usize,
    ) -> Result<Option<LogisticsContext>, AdapterError> {
        let Some(shipment) = self.get_shipment(tracking_id).await? else {
            return Ok(None);
        };
        let events = self.get_events(tracking_id, event_limit).await?;
        Ok(Some(LogisticsContext { shipment, events }))
    }
}
