//! CRM entities: accounts, contacts and their interaction history.

use crate::domain::schema::{lenient, lenient_opt, non_empty, Schema};
use crate::domain::value_objects::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer account (company or household).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmAccount {
    #[serde(deserialize_with = "non_empty")]
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub lifecycle_stage: Option<String>,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for CrmAccount {
    const NAME: &'static str = "CrmAccount";
}

/// A person reachable through the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmContact {
    #[serde(deserialize_with = "non_empty")]
    pub contact_id: String,
    /// Owning account, when the contact is linked to one.
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub marketing_opt_in: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub preferences: Record,
    #[serde(default)]
    pub attributes: Record,
}

impl Schema for CrmContact {
    const NAME: &'static str = "CrmContact";
}

/// A single touchpoint (call, email, chat) with a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmInteraction {
    #[serde(deserialize_with = "non_empty")]
    pub interaction_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    pub channel: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub metadata: Record,
}

impl Schema for CrmInteraction {
    const NAME: &'static str = "CrmInteraction";
}

/// Everything an agent needs to know about one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmContext {
    pub contact: CrmContact,
    pub account: Option<CrmAccount>,
    pub interactions: Vec<CrmInteraction>,
}
