//! Funnel Connector

use crate::application::connector::Connector;
use crate::domain::entities::{FunnelContext, FunnelMetric};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

pub const DEFAULT_METRIC_LIMIT: usize = 20;

/// Conversion metrics, optionally scoped to a campaign and/or account.
pub struct FunnelConnector {
    connector: Connector,
}

impl FunnelConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    pub async fn get_metrics(
        &self,
        campaign_id: Option<&str>,
        account_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<FunnelMetric>, AdapterError> {
        let query = Query::new()
            .with("entity", "funnel")
            .with_opt("campaign_id", campaign_id)
            .with_opt("account_id", account_id)
            .with("limit", limit);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    /// Always produces a context, possibly with no metrics.
    pub async fn build_funnel_context(
        &self,
        campaign_id: Option<&str>,
        account_id: Option<&str>,
        limit: usize,
    ) -> Result<FunnelContext, AdapterError> {
        let metrics = self.get_metrics(campaign_id, account_id, limit).await?;
        Ok(FunnelContext {
            campaign_id: campaign_id.map(str::to_string),
            account_id: account_id.map(str::to_string),
            metrics,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::{DashMapUpstream, MockFunnelUpstream};
    use crate::application::ResilientAdapter;
    use crate::config::{AdapterConfig, ConnectorConfig};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_build_funnel_context() {
        let adapter = Arc::new(ResilientAdapter::new(MockFunnelUpstream, AdapterConfig::default()));
        let funnel = FunnelConnector::new(Connector::new(Some(adapter), ConnectorConfig::default()));

        let ctx = funnel
            .build_funnel_context(Some("cmp-1"), None, DEFAULT_METRIC_LIMIT)
            .await
            .unwrap();

        assert_eq!(ctx.campaign_id.as_deref(), Some("cmp-1"));
        assert!(ctx.account_id.is_none());
        let total: u64 = ctx.metrics.iter().map(|m| m.count).sum();
        assert_eq!(total, 125);
    }

    #[tokio::test]
    async fn test_empty_context() {
        let adapter = Arc::new(ResilientAdapter::new(
            DashMapUpstream::new("funnel", "stage"),
            AdapterConfig::default(),
        ));
        let funnel = FunnelConnector::new(Connector::new(Some(adapter), ConnectorConfig::default()));

        let ctx = funnel.build_funnel_context(None, Some("acct"), 10).await.unwrap();
        assert!(ctx.metrics.is_empty());
        assert_eq!(ctx.account_id.as_deref(), Some("acct"));
    }
}
