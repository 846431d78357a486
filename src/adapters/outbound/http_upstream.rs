//! HTTP Upstream
//!
//! JSON-over-HTTP client for upstream systems exposing a plain REST surface:
//!
//! - `GET    {base}/health`          connectivity probe
//! - `GET    {base}/{entity}?k=v`    fetch, remaining query fields as parameters
//! - `PUT    {base}/{entity}/{id}`   upsert
//! - `DELETE {base}/{entity}/{id}`   delete (404 means nothing was removed)
//!
//! Timeouts and retries are owned by the resilient adapter, not this client.

use crate::domain::ports::Upstream;
use crate::domain::value_objects::{Options, Query, Record};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;

/// HTTP upstream configuration.
#[derive(Debug, Clone)]
pub struct HttpUpstreamConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Collection used when a query or payload names no `entity`
    pub entity: String,
    /// Payload field holding the record identifier
    pub id_field: String,
}

impl HttpUpstreamConfig {
    pub fn new(base_url: impl Into<String>, entity: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            entity: entity.into(),
            id_field: "id".to_string(),
        }
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }
}

/// reqwest-backed upstream.
pub struct HttpUpstream {
    config: HttpUpstreamConfig,
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(config: HttpUpstreamConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured client (proxies, default headers, TLS roots).
    pub fn with_client(config: HttpUpstreamConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &HttpUpstreamConfig {
        &self.config
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            anyhow::bail!("invalid path segment {:?}", bad);
        }
        let mut url = Url::parse(&self.config.base_url)
            .with_context(|| format!("invalid base url {}", self.config.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url {} cannot have a path", self.config.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn query_params(query: &Query) -> Vec<(String, String)> {
        query
            .iter()
            .filter(|(field, _)| field.as_str() != "entity")
            .map(|(field, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (field.clone(), value)
            })
            .collect()
    }

    async fn check(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{} returned {} - {}", url, status, body)
    }
}

fn into_records(body: Value) -> anyhow::Result<Vec<Record>> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(anyhow!("expected a JSON object, got {}", other)),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        Value::Null => Ok(Vec::new()),
        other => Err(anyhow!("expected a JSON array, got {}", other)),
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    fn name(&self) -> &str {
        &self.config.entity
    }

    async fn connect(&self, options: &Options) -> anyhow::Result<()> {
        let url = self.url(&["health"])?;
        let mut request = self.client.get(url.clone());
        if let Some(Value::String(token)) = options.get("token") {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.with_context(|| format!("GET {}", url))?;
        Self::check(response).await?;
        tracing::info!("connected to {}", self.config.base_url);
        Ok(())
    }

    async fn fetch(&self, query: &Query) -> anyhow::Result<Vec<Record>> {
        let entity = query.get_str("entity").unwrap_or(&self.config.entity);
        let url = self.url(&[entity])?;

        let response = self
            .client
            .get(url.clone())
            .query(&Self::query_params(query))
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;
        let body: Value = Self::check(response).await?.json().await?;

        into_records(body)
    }

    async fn upsert(&self, payload: &Record) -> anyhow::Result<Option<Record>> {
        let id = match payload.get(&self.config.id_field) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => anyhow::bail!("payload is missing `{}`", self.config.id_field),
        };
        let entity = payload
            .get("entity")
            .and_then(Value::as_str)
            .unwrap_or(&self.config.entity);
        let url = self.url(&[entity, id.as_str()])?;

        let response = self
            .client
            .put(url.clone())
            .json(payload)
            .send()
            .await
            .with_context(|| format!("PUT {}", url))?;
        let bytes = Self::check(response).await?.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice(&bytes)? {
            Value::Object(record) => Ok(Some(record)),
            Value::Null => Ok(None),
            other => Err(anyhow!("expected a JSON object, got {}", other)),
        }
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let url = self.url(&[self.config.entity.as_str(), id])?;
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("DELETE {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }
}
