//! CRM Connector
//!
//! Contacts, accounts and interaction history, assembled into a single
//! context for agent prompts.

use crate::application::connector::Connector;
use crate::domain::entities::{CrmAccount, CrmContact, CrmContext, CrmInteraction};
use crate::domain::error::AdapterError;
use crate::domain::value_objects::Query;

/// Interactions fetched per context unless told otherwise.
pub const DEFAULT_INTERACTION_LIMIT: usize = 20;

pub struct CrmConnector {
    connector: Connector,
}

impl CrmConnector {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut Connector {
        &mut self.connector
    }

    pub async fn get_contact(&self, contact_id: &str) -> Result<Option<CrmContact>, AdapterError> {
        let query = Query::new().with("entity", "contact").with("id", contact_id);
        let record = self.connector.fetch_first(&query).await?;
        self.connector.map_single(record)
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Option<CrmAccount>, AdapterError> {
        let query = Query::new().with("entity", "account").with("id", account_id);
        let record = self.connector.fetch_first(&query).await?;
        self.connector.map_single(record)
    }

    /// Recent interactions for a contact.
    pub async fn get_interactions(&self, contact_id: &str, limit: usize) -> Result<Vec<CrmInteraction>, AdapterError> {
        let query = Query::new()
            .with("entity", "interaction")
            .with("contact_id", contact_id)
            .with("limit", limit);
        let records = self.connector.fetch_many(&query).await?;
        self.connector.map_many(records).await
    }

    /// Contact, linked account and recent interactions.
    ///
    /// Returns `None` when the contact does not exist. The account is only
    /// looked up when the contact links one.
    pub async fn build_contact_context(
        &self,
        contact_id: &str,
        interaction_limit: usize,
    ) -> Result<Option<CrmContext>, AdapterError> {
        let Some(contact) = self.get_contact(contact_id).await? else {
            return Ok(None);
        };

        let account = match contact.account_id.as_deref() {
            Some(account_id) => self.get_account(account_id).await?,
            None => None,
        };
        let interactions = self.get_interactions(contact_id, interaction_limit).await?;

        Ok(Some(CrmContext {
            contact,
            account,
            interactions,
        }))
    }
}
