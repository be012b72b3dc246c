//! Query-string and body parameters for web handlers

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::MAX_SEARCH_LIMIT_CHARS;
use crate::core::input_type::{InputType, ToJson};
use crate::core::node_kind::NodeKind;
use crate::web::errors::ApiError;

/// Filters for `GET /api/artifacts`
///
/// # Example
/// ```
/// use relay_artifacts::web::params::ArtifactListParams;
/// use serde_json::json;
///
/// let params: ArtifactListParams =
///     serde_json::from_value(json!({"kind": "Request", "q": "Profile"})).unwrap();
/// assert_eq!(params.q.as_deref(), Some("Profile"));
/// ```
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ArtifactListParams {
    /// Only artifacts of this kind; must be one of the catalog values
    #[serde(default)]
    pub kind: Option<NodeKind>,

    /// Case-insensitive substring of the artifact name
    #[serde(default, deserialize_with = "validate_query")]
    pub q: Option<String>,
}

/// Characters allowed in a name search: GraphQL name characters plus the `$`
/// separating a fragment from its split operation suffix
fn is_search_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn validate_query<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let query: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref q) = query {
        if q.len() > MAX_SEARCH_LIMIT_CHARS {
            return Err(Error::custom(format!(
                "Query length {} exceeds maximum allowed length of {}",
                q.len(),
                MAX_SEARCH_LIMIT_CHARS
            )));
        }
        if !q.chars().all(is_search_char) {
            return Err(Error::custom(
                "Query contains invalid characters. \
                 Only letters, numbers, underscores and '$' are allowed",
            ));
        }
    }

    Ok(query)
}

impl ArtifactListParams {
    pub fn matches(&self, name: &str, kind: NodeKind) -> bool {
        let kind_matches = self.kind.is_none_or(|wanted| wanted == kind);
        let name_matches = self
            .q
            .as_ref()
            .is_none_or(|q| name.to_lowercase().contains(&q.to_lowercase()));
        kind_matches && name_matches
    }
}

/// Merge the request body with query-string values into operation variables.
///
/// Body values win. Query-string values fill the gaps and are converted with the
/// GraphQL type the operation declares for them; undeclared ones stay strings.
pub fn merge_parameters(
    query_params: &HashMap<String, String>,
    body: Option<&Value>,
    variable_types: &BTreeMap<String, String>,
) -> Result<Map<String, Value>, ApiError> {
    let mut params = match body {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(other) => {
            return Err(ApiError::InvalidQuery(format!(
                "Variables must be a JSON object, got {other}"
            )));
        }
    };

    for (key, value) in query_params {
        if params.contains_key(key) {
            continue;
        }

        let converted = match variable_types.get(key) {
            Some(type_name) => {
                let input_type = type_name
                    .parse::<InputType>()
                    .map_err(|e| ApiError::Internal(e.to_string()))?;
                value
                    .as_str()
                    .to_json(&input_type)
                    .map_err(|e| ApiError::InvalidQuery(format!("Variable '{key}': {e}")))?
            }
            None => Value::String(value.to_string()),
        };
        params.insert(key.to_string(), converted);
    }

    Ok(params)
}
