use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// One row of a query result. Geometry is never requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Feature {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Decodes every feature with `decode`. Rows that fail are logged and skipped.
    pub fn decode<T, F, E>(&self, decode: F) -> Vec<T>
    where
        F: Fn(&Map<String, Value>) -> Result<T, E>,
        E: Display,
    {
        self.features
            .iter()
            .enumerate()
            .filter_map(|(row, f)| match decode(&f.attributes) {
                Ok(v) => Some(v),
                Err(error) => {
                    warn!(row, %error, "skipping undecodable row");
                    None
                }
            })
            .collect()
    }
}

/// Error object embedded in an HTTP 200 reply.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Raw `query` reply: either features or an `error` object.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QueryReply {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub error: Option<ServiceErrorBody>,
}
