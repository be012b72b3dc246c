//! Parameters identifying a GraphQL request, either by persisted id or by inline text

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

use crate::core::provided_variables::ProvidedVariablesType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// How the server is told which document to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// A document the server already knows under `id`
    Persisted { id: String, cache_id: Option<String> },
    /// The document text itself, with `cache_id` as the hash of `text`
    Text { text: String, cache_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParametersError {
    #[error("Request '{name}' has both a persisted id and query text")]
    BothIdAndText { name: String },

    #[error("Request '{name}' has neither a persisted id nor query text")]
    MissingQuerySource { name: String },

    #[error("Request '{name}' has query text but no cacheID")]
    MissingCacheId { name: String },

    #[error("Request '{name}' has cacheID '{found}' but its text hashes to '{expected}'")]
    CacheIdMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

/// Lowercase hex MD5 of the query text, as emitted by the compiler
pub fn compute_cache_id(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequestParameters", into = "RawRequestParameters")]
pub struct RequestParameters {
    pub name: String,
    pub operation_kind: OperationKind,
    pub source: QuerySource,
    pub provided_variables: Option<ProvidedVariablesType>,
    pub metadata: Map<String, Value>,
}

impl RequestParameters {
    pub fn persisted(
        name: impl Into<String>,
        operation_kind: OperationKind,
        id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operation_kind,
            source: QuerySource::Persisted {
                id: id.into(),
                cache_id: None,
            },
            provided_variables: None,
            metadata: Map::new(),
        }
    }

    /// Builds text parameters, deriving the cache id from `text`
    pub fn with_text(
        name: impl Into<String>,
        operation_kind: OperationKind,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let cache_id = compute_cache_id(&text);
        Self {
            name: name.into(),
            operation_kind,
            source: QuerySource::Text { text, cache_id },
            provided_variables: None,
            metadata: Map::new(),
        }
    }

    pub fn with_provided_variables(mut self, provided_variables: ProvidedVariablesType) -> Self {
        self.provided_variables = Some(provided_variables);
        self
    }

    pub fn id(&self) -> Option<&str> {
        match &self.source {
            QuerySource::Persisted { id, .. } => Some(id),
            QuerySource::Text { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.source {
            QuerySource::Persisted { .. } => None,
            QuerySource::Text { text, .. } => Some(text),
        }
    }

    /// Key for local caching: the text hash, or for persisted queries the
    /// compiler-provided cache id falling back to the id itself
    pub fn cache_id(&self) -> &str {
        match &self.source {
            QuerySource::Persisted { id, cache_id } => cache_id.as_deref().unwrap_or(id),
            QuerySource::Text { cache_id, .. } => cache_id,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self.source, QuerySource::Persisted { .. })
    }
}

/// The shape found in artifact files, before the id/text invariants are checked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequestParameters {
    #[serde(rename = "cacheID", default, skip_serializing_if = "Option::is_none")]
    cache_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
    name: String,
    operation_kind: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provided_variables: Option<ProvidedVariablesType>,
    #[serde(default)]
    text: Option<String>,
}

impl TryFrom<RawRequestParameters> for RequestParameters {
    type Error = ParametersError;

    fn try_from(raw: RawRequestParameters) -> Result<Self, Self::Error> {
        let source = match (raw.id, raw.text) {
            (Some(_), Some(_)) => {
                return Err(ParametersError::BothIdAndText { name: raw.name });
            }
            (None, None) => {
                return Err(ParametersError::MissingQuerySource { name: raw.name });
            }
            (Some(id), None) => QuerySource::Persisted {
                id,
                cache_id: raw.cache_id,
            },
            (None, Some(text)) => {
                let found = raw.cache_id.ok_or_else(|| ParametersError::MissingCacheId {
                    name: raw.name.clone(),
                })?;
                let expected = compute_cache_id(&text);
                if found != expected {
                    return Err(ParametersError::CacheIdMismatch {
                        name: raw.name,
                        expected,
                        found,
                    });
                }
                QuerySource::Text {
                    text,
                    cache_id: found,
                }
            }
        };

        Ok(Self {
            name: raw.name,
            operation_kind: raw.operation_kind,
            source,
            provided_variables: raw.provided_variables,
            metadata: raw.metadata,
        })
    }
}

impl From<RequestParameters> for RawRequestParameters {
    fn from(params: RequestParameters) -> Self {
        let (id, text, cache_id) = match params.source {
            QuerySource::Persisted { id, cache_id } => (Some(id), None, cache_id),
            QuerySource::Text { text, cache_id } => (None, Some(text), Some(cache_id)),
        };

        Self {
            cache_id,
            id,
            metadata: params.metadata,
            name: params.name,
            operation_kind: params.operation_kind,
            provided_variables: params.provided_variables,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEXT: &str = "query AppQuery {\n  viewer {\n    id\n  }\n}\n";

    #[test]
    fn test_compute_cache_id_is_md5_hex() {
        assert_eq!(compute_cache_id(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(compute_cache_id("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_text_parameters_from_json() {
        let json = json!({
            "cacheID": compute_cache_id(TEXT),
            "id": null,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query",
            "text": TEXT
        });

        let params: RequestParameters = serde_json::from_value(json).unwrap();
        assert_eq!(params.name, "AppQuery");
        assert_eq!(params.operation_kind, OperationKind::Query);
        assert_eq!(params.text(), Some(TEXT));
        assert_eq!(params.id(), None);
        assert_eq!(params.cache_id(), compute_cache_id(TEXT));
        assert!(!params.is_persisted());
    }

    #[test]
    fn test_persisted_parameters_from_json() {
        let json = json!({
            "id": "a1b2c3",
            "text": null,
            "metadata": {"relayTestingSelectionTypeInfo": {}},
            "name": "UpdateMutation",
            "operationKind": "mutation"
        });

        let params: RequestParameters = serde_json::from_value(json).unwrap();
        assert!(params.is_persisted());
        assert_eq!(params.id(), Some("a1b2c3"));
        assert_eq!(params.text(), None);
        assert_eq!(params.cache_id(), "a1b2c3");
        assert!(params.metadata.contains_key("relayTestingSelectionTypeInfo"));
    }

    #[test]
    fn test_persisted_parameters_keep_cache_id() {
        let json = json!({
            "cacheID": "deadbeef",
            "id": "a1b2c3",
            "text": null,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query"
        });

        let params: RequestParameters = serde_json::from_value(json).unwrap();
        assert_eq!(params.cache_id(), "deadbeef");
    }

    #[test]
    fn test_rejects_both_id_and_text() {
        let json = json!({
            "cacheID": compute_cache_id(TEXT),
            "id": "a1b2c3",
            "text": TEXT,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query"
        });

        let err = serde_json::from_value::<RequestParameters>(json).unwrap_err();
        assert!(err.to_string().contains("both a persisted id and query text"));
    }

    #[test]
    fn test_rejects_missing_source() {
        let json = json!({
            "cacheID": "x",
            "id": null,
            "text": null,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query"
        });

        let err = serde_json::from_value::<RequestParameters>(json).unwrap_err();
        assert!(err.to_string().contains("neither a persisted id nor query text"));
    }

    #[test]
    fn test_rejects_text_without_cache_id() {
        let raw = RawRequestParameters {
            cache_id: None,
            id: None,
            metadata: Map::new(),
            name: "AppQuery".to_string(),
            operation_kind: OperationKind::Query,
            provided_variables: None,
            text: Some(TEXT.to_string()),
        };

        assert_eq!(
            RequestParameters::try_from(raw),
            Err(ParametersError::MissingCacheId {
                name: "AppQuery".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_cache_id_mismatch() {
        let json = json!({
            "cacheID": "0000",
            "id": null,
            "text": TEXT,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query"
        });

        let err = serde_json::from_value::<RequestParameters>(json).unwrap_err();
        assert!(err.to_string().contains("has cacheID '0000'"));
    }

    #[test]
    fn test_serializes_absent_side_as_null() {
        let params = RequestParameters::with_text("AppQuery", OperationKind::Query, TEXT);
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["id"], Value::Null);
        assert_eq!(json["text"], json!(TEXT));
        assert_eq!(json["cacheID"], json!(compute_cache_id(TEXT)));
        assert_eq!(json["operationKind"], json!("query"));
        assert!(json.get("providedVariables").is_none());

        let persisted = RequestParameters::persisted("AppQuery", OperationKind::Subscription, "42");
        let json = serde_json::to_value(&persisted).unwrap();
        assert_eq!(json["id"], json!("42"));
        assert_eq!(json["text"], Value::Null);
        assert_eq!(json["operationKind"], json!("subscription"));
    }

    #[test]
    fn test_provided_variables_survive_decoding() {
        let json = json!({
            "cacheID": compute_cache_id(TEXT),
            "id": null,
            "text": TEXT,
            "metadata": {},
            "name": "AppQuery",
            "operationKind": "query",
            "providedVariables": {
                "__relay_internal__pv__IsMobile": "IsMobile.relayprovider"
            }
        });

        let params: RequestParameters = serde_json::from_value(json).unwrap();
        let provided = params.provided_variables.unwrap();
        assert_eq!(
            provided.get("__relay_internal__pv__IsMobile").map(String::as_str),
            Some("IsMobile.relayprovider")
        );
    }
}
