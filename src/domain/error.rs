//! Adapter Error
//!
//! The single error type surfaced by adapters and connectors. Variants tell
//! the origins apart; the source chain keeps the underlying cause.

use std::time::Duration;

/// Error returned by every adapter and connector operation.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Every attempt of a protected operation failed.
    #[error("Operation failed after retries")]
    RetriesExhausted {
        #[source]
        source: anyhow::Error,
    },

    /// The circuit breaker rejected the call without attempting it.
    #[error("Circuit breaker open")]
    CircuitOpen,

    /// A payload could not be coerced into the target schema.
    #[error("Invalid payload for {schema}")]
    Validation {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A connector-level fetch failed; `query` is the canonical query text.
    #[error("Failed to fetch data for query: {query}")]
    Fetch {
        query: String,
        #[source]
        source: Box<AdapterError>,
    },

    /// The upstream connect hook failed.
    #[error("Failed to connect to upstream")]
    Connect {
        #[source]
        source: anyhow::Error,
    },

    /// A connector was used before an adapter was attached.
    #[error("Adapter has not been configured.")]
    NotConfigured,

    /// A single attempt exceeded its time budget.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AdapterError {
    /// Whether this error (or the error it wraps) is an open-circuit rejection.
    pub fn is_circuit_open(&self) -> bool {
        match self {
            AdapterError::CircuitOpen => true,
            AdapterError::Fetch { source, .. } => source.is_circuit_open(),
            _ => false,
        }
    }

    /// Whether this error is a schema validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, AdapterError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_messages() {
        assert_eq!(AdapterError::CircuitOpen.to_string(), "Circuit breaker open");
        assert_eq!(
            AdapterError::NotConfigured.to_string(),
            "Adapter has not been configured."
        );
        let err = AdapterError::RetriesExhausted {
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.to_string(), "Operation failed after retries");
    }

    #[test]
    fn test_retries_exhausted_keeps_cause() {
        let err = AdapterError::RetriesExhausted {
            source: anyhow::anyhow!("upstream 503"),
        };
        let source = err.source().expect("source is kept");
        assert_eq!(source.to_string(), "upstream 503");
    }

    #[test]
    fn test_validation_names_schema() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = AdapterError::Validation {
            schema: "CrmContact",
            source,
        };
        assert_eq!(err.to_string(), "Invalid payload for CrmContact");
        assert!(err.is_validation());
    }

    #[test]
    fn test_fetch_wraps_circuit_open() {
        let err = AdapterError::Fetch {
            query: "{\"entity\":\"contact\"}".to_string(),
            source: Box::new(AdapterError::CircuitOpen),
        };
        assert!(err.to_string().starts_with("Failed to fetch data for query:"));
        assert!(err.is_circuit_open());
        assert_eq!(err.source().unwrap().to_string(), "Circuit breaker open");
    }
}
