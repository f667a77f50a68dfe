//! Persisted document envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::model::ConfigModel;

/// Storage key of the single persisted document
pub const STORAGE_KEY: &str = "anyrouter-config-v1";

/// Schema version written by this build
pub const STORAGE_VERSION: u64 = 3;

/// Current-version envelope as written on every save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDocument {
    pub version: u64,
    #[serde(rename = "savedAt", with = "crate::utils::datetime", default)]
    pub saved_at: Option<DateTime<Utc>>,
    pub data: ConfigModel,
}

impl PersistedDocument {
    /// Wraps a model snapshot in a current-version envelope.
    #[must_use]
    pub fn new(data: ConfigModel, saved_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version: STORAGE_VERSION,
            saved_at,
            data,
        }
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::from)
    }
}

/// Persistence indicator for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Whether the store currently holds a document
    pub cached: bool,
    /// Time of the last successful save in this session (or loaded from the document)
    #[serde(with = "crate::utils::datetime")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Decoded envelope of unknown vintage, not yet migrated
///
/// Only the outer `{version, savedAt, data}` shape is checked here; the payload is kept
/// as raw JSON so each schema version can be read by its own rules.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEnvelope {
    /// `None` when missing or not an unsigned integer
    pub version: Option<u64>,
    pub saved_at: Option<DateTime<Utc>>,
    /// `None` when the `data` field is missing or `null`
    pub data: Option<Value>,
}

impl StoredEnvelope {
    /// Parses raw stored text. Fails when the text is not a JSON object.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut fields) = value else {
            return Err(CoreError::SerializationError(
                "stored document is not a JSON object".to_string(),
            ));
        };

        let version = fields.get("version").and_then(Value::as_u64);
        let saved_at = fields
            .get("savedAt")
            .and_then(crate::utils::datetime::from_value);
        let data = fields.remove("data").filter(|v| !v.is_null());

        Ok(Self {
            version,
            saved_at,
            data,
        })
    }
}
