pub use foundation::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::QueryError;
use crate::feature::{Feature, FeatureSet, QueryReply};
use crate::filter::{FeatureQuery, OutFields};

/// A queryable attribute table.
///
/// Implementations must be `Send + Sync`; methods return boxed futures for
/// dyn-compatibility.
pub trait FeatureService: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    fn query(&self, query: &FeatureQuery) -> BoxFuture<'_, Result<FeatureSet, QueryError>>;
}

/// Feature service reached over HTTP (`<layer url>/query?f=json`).
pub struct HttpFeatureService {
    name: String,
    layer_url: String,
    client: reqwest::Client,
}

impl HttpFeatureService {
    /// `layer_url` points at one layer or table, e.g. `.../FeatureServer/0`.
    pub fn new(layer_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_client(layer_url, name, reqwest::Client::new())
    }

    pub fn with_client(
        layer_url: impl Into<String>,
        name: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            layer_url: layer_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.layer_url)
    }
}

impl FeatureService for HttpFeatureService {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, query: &FeatureQuery) -> BoxFuture<'_, Result<FeatureSet, QueryError>> {
        let url = self.query_url();
        let params = query.params();
        Box::pin(async move {
            debug!(service = %self.name, %url, ?params, "feature query");
            let resp = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|source| QueryError::Http {
                    service: self.name.clone(),
                    source,
                })?;

            if !resp.status().is_success() {
                return Err(QueryError::Status {
                    service: self.name.clone(),
                    status: resp.status().as_u16(),
                });
            }

            let reply: QueryReply = resp.json().await.map_err(|source| QueryError::Payload {
                service: self.name.clone(),
                source,
            })?;

            // The REST API reports failures inside a 200 reply.
            if let Some(err) = reply.error {
                return Err(QueryError::Service {
                    service: self.name.clone(),
                    code: err.code,
                    message: err.message,
                });
            }

            Ok(FeatureSet {
                features: reply.features,
            })
        })
    }
}

/// In-memory attribute table for tests and offline use.
///
/// Evaluates the structured filter of a query; `OBJECTID` backs object-id
/// lookups.
pub struct MemoryFeatureService {
    name: String,
    rows: RwLock<Vec<Map<String, Value>>>,
    failure: RwLock<Option<String>>,
    log: RwLock<Vec<FeatureQuery>>,
}

impl MemoryFeatureService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            log: RwLock::new(Vec::new()),
        }
    }

    /// Builds a service from JSON objects; non-object values are ignored.
    pub fn from_rows(name: impl Into<String>, rows: impl IntoIterator<Item = Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
            ..Self::new(name)
        }
    }

    pub async fn push_row(&self, row: Map<String, Value>) {
        self.rows.write().await.push(row);
    }

    /// Makes every following query fail with `message`; `None` restores service.
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.write().await = message;
    }

    /// Queries received so far, oldest first.
    pub async fn queries(&self) -> Vec<FeatureQuery> {
        self.log.read().await.clone()
    }
}

fn project(row: &Map<String, Value>, out_fields: &OutFields) -> Map<String, Value> {
    match out_fields {
        OutFields::All => row.clone(),
        OutFields::Only(fields) => fields
            .iter()
            .filter_map(|f| row.get(f).map(|v| (f.clone(), v.clone())))
            .collect(),
    }
}

impl FeatureService for MemoryFeatureService {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, query: &FeatureQuery) -> BoxFuture<'_, Result<FeatureSet, QueryError>> {
        let query = query.clone();
        Box::pin(async move {
            self.log.write().await.push(query.clone());
            if let Some(message) = self.failure.read().await.clone() {
                return Err(QueryError::Unavailable(format!("{}: {message}", self.name)));
            }

            let rows = self.rows.read().await;
            let features = rows
                .iter()
                .filter(|row| query.filter.matches(row))
                .filter(|row| {
                    query.object_ids.is_empty()
                        || row
                            .get("OBJECTID")
                            .and_then(Value::as_i64)
                            .is_some_and(|id| query.object_ids.contains(&id))
                })
                .map(|row| Feature::new(project(row, &query.out_fields)))
                .collect();
            Ok(FeatureSet { features })
        })
    }
}
