//! Hashing System - SHA-256 for Build Reports
//!
//! Every artifact written by a run is hashed so two runs over the same corpus
//! can be compared byte for byte.

use sha2::{Sha256, Digest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, to_string};
use std::collections::BTreeMap;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Artifact path (relative to the output root, `/`-separated) to content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub artifacts: BTreeMap<String, String>,
}

impl BuildReport {
    pub fn record(&mut self, path: impl Into<String>, contents: &[u8]) {
        self.artifacts.insert(path.into(), sha256_hex(contents));
    }

    pub fn hash_of(&self, path: &str) -> Option<&str> {
        self.artifacts.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Single hash over every recorded artifact.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let canonical = canonical_json(self)?;
        Ok(sha256_hex(canonical.as_bytes()))
    }
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
