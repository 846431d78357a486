//! Conversion funnel entities.

use crate::domain::schema::{lenient, lenient_opt, Schema};
use crate::domain::value_objects::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Volume and conversion for one funnel stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelMetric {
    pub stage: String,
    #[serde(deserialize_with = "lenient")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub conversion_rate: Option<f64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub stage_time_ms: Option<f64>,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for FunnelMetric {
    const NAME: &'static str = "FunnelMetric";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelContext {
    pub campaign_id: Option<String>,
    pub account_id: Option<String>,
    pub metrics: Vec<FunnelMetric>,
    pub updated_at: Option<DateTime<Utc>>,
}
