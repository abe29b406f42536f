//! Persisted cache record.
//!
//! Durable backends do not store a bare [`ShotGridResult`]: they wrap it in a
//! [`CacheRecord`] carrying a schema version and a SHA-256 checksum of the
//! result bytes. A record written by another schema version, or whose bytes do
//! not match the checksum, is rejected and the caller treats it as a miss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};

use super::repository::{RepositoryError, RepositoryResult};
use crate::models::ShotGridResult;

/// Bump whenever the aggregation or the result layout changes.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// On-disk envelope around one result.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub schema_version: u32,
    pub stored_at: DateTime<Utc>,
    pub checksum: String,
    result: Box<RawValue>,
}

/// Why a stored record was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordRejection {
    #[error("schema version {found} does not match {expected}")]
    SchemaVersion { found: u32, expected: u32 },
    #[error("checksum mismatch (stored {stored}, computed {computed})")]
    ChecksumMismatch { stored: String, computed: String },
    #[error("result payload is not a shot grid: {0}")]
    Malformed(String),
}

impl CacheRecord {
    /// Wrap `result` in a record stamped with the current schema version.
    pub fn seal(result: &ShotGridResult) -> RepositoryResult<Self> {
        let raw = serde_json::to_string(result)?;
        let checksum = checksum(raw.as_bytes());
        let result = RawValue::from_string(raw)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        Ok(Self {
            schema_version: CACHE_SCHEMA_VERSION,
            stored_at: Utc::now(),
            checksum,
            result,
        })
    }

    /// Verify the record and decode the result.
    pub fn open(&self) -> Result<ShotGridResult, RecordRejection> {
        if self.schema_version != CACHE_SCHEMA_VERSION {
            return Err(RecordRejection::SchemaVersion {
                found: self.schema_version,
                expected: CACHE_SCHEMA_VERSION,
            });
        }
        let computed = checksum(self.result.get().as_bytes());
        if computed != self.checksum {
            return Err(RecordRejection::ChecksumMismatch {
                stored: self.checksum.clone(),
                computed,
            });
        }
        serde_json::from_str(self.result.get())
            .map_err(|e| RecordRejection::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> RepositoryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
