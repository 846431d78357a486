//! DashMap Upstream
//!
//! In-memory record store implementing Upstream using DashMap for lock-free
//! concurrent access. Each store holds one entity collection and serves as a
//! local stand-in for a real system of record.

use crate::domain::ports::Upstream;
use crate::domain::value_objects::{Options, Query, Record};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Query fields that select or shape results instead of matching a record field.
const CONTROL_FIELDS: [&str; 2] = ["entity", "limit"];

/// DashMap-backed upstream.
///
/// Records are keyed by `id_field`. A fetch naming another `entity` finds
/// nothing; otherwise it returns every record whose fields equal all query
/// fields. The `id` query field is an alias for `id_field` and `limit` caps
/// the result.
pub struct DashMapUpstream {
    entity: String,
    id_field: String,
    records: Arc<DashMap<String, Record>>,
}

impl DashMapUpstream {
    pub fn new(entity: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id_field: id_field.into(),
            records: Arc::new(DashMap::new()),
        }
    }

    /// Store records directly, bypassing the async interface.
    pub fn seed(&self, records: impl IntoIterator<Item = Record>) -> anyhow::Result<()> {
        for record in records {
            let id = self.record_id(&record)?;
            self.records.insert(id, record);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    fn record_id(&self, record: &Record) -> anyhow::Result<String> {
        match record.get(&self.id_field) {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(anyhow!("record is missing `{}`", self.id_field)),
        }
    }

    fn serves(&self, query: &Query) -> bool {
        query.get_str("entity").map_or(true, |entity| entity == self.entity)
    }

    fn matches(&self, record: &Record, query: &Query) -> bool {
        query
            .iter()
            .filter(|(field, _)| !CONTROL_FIELDS.contains(&field.as_str()))
            .all(|(field, expected)| {
                let field = if field == "id" { self.id_field.as_str() } else { field.as_str() };
                record.get(field) == Some(expected)
            })
    }
}

#[async_trait]
impl Upstream for DashMapUpstream {
    fn name(&self) -> &str {
        &self.entity
    }

    async fn connect(&self, _options: &Options) -> anyhow::Result<()> {
        Ok(())
    }

    async fn fetch(&self, query: &Query) -> anyhow::Result<Vec<Record>> {
        if !self.serves(query) {
            return Ok(Vec::new());
        }
        let limit = query.get_u64("limit").map_or(usize::MAX, |n| n as usize);

        let mut found: Vec<Record> = self
            .records
            .iter()
            .filter(|entry| self.matches(entry.value(), query))
            .map(|entry| entry.value().clone())
            .collect();

        // DashMap iteration order is arbitrary; keep results stable
        found.sort_by(|a, b| {
            let a = a.get(&self.id_field).map(Value::to_string);
            let b = b.get(&self.id_field).map(Value::to_string);
            a.cmp(&b)
        });
        found.truncate(limit);
        Ok(found)
    }

    async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
        let id = self
            .record_id(payload)
            .with_context(|| format!("cannot upsert into {}", self.entity))?;
        self.records.insert(id, payload.clone());
        Ok(Some(payload.clone()))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.records.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn store() -> DashMapUpstream {
        let store = DashMapUpstream::new("product", "sku");
        store
            .seed([
                record(json!({"sku": "A", "category": "lamps", "name": "Desk lamp"})),
                record(json!({"sku": "B", "category": "lamps", "name": "Floor lamp"})),
                record(json!({"sku": "C", "category": "chairs", "name": "Stool"})),
            ])
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_fetch_filters_on_fields() {
        let store = store();
        let query = Query::new().with("entity", "product").with("category", "lamps");
        let found = store.fetch(&query).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["sku"], "A");
        assert_eq!(found[1]["sku"], "B");
    }

    #[tokio::test]
    async fn test_fetch_other_entity_is_empty() {
        let store = store();
        let query = Query::new().with("entity", "related").with("sku", "A");
        assert!(store.fetch(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_id_alias_and_limit() {
        let store = store();
        let found = store.fetch(&Query::new().with("id", "C")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], "Stool");

        let found = store.fetch(&Query::new().with("limit", 1)).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_requires_id() {
        let store = store();
        let err = store.upsert(&record(json!({"name": "nameless"}))).await.unwrap_err();
        assert!(format!("{:#}", err).contains("missing `sku`"));

        store.upsert(&record(json!({"sku": "D", "name": "Rug"}))).await.unwrap();
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = store();
        assert!(store.delete("A").await.unwrap());
        assert!(!store.delete("A").await.unwrap());
        assert_eq!(store.len(), 2);
    }
}
