//! Request bodies sent to a GraphQL endpoint for compiled requests

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::argument::ArgumentDefinition;
use crate::core::concrete::{ConcreteRequest, OperationType, PreloadableConcreteRequest};
use crate::core::error::ArtifactError;
use crate::core::normalization::NormalizationOperation;
use crate::core::provided_variables::{ProvidedVariableRegistry, ProvidedVariables};
use crate::core::request_parameters::{QuerySource, RequestParameters};

/// Body of a GraphQL-over-HTTP request, persisted documents travel as `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub operation_name: String,
    pub variables: Map<String, Value>,
}

impl GraphQLRequestBody {
    pub fn new(params: &RequestParameters, variables: Map<String, Value>) -> Self {
        let (id, query) = match &params.source {
            QuerySource::Persisted { id, .. } => (Some(id.clone()), None),
            QuerySource::Text { text, .. } => (None, Some(text.clone())),
        };

        Self {
            id,
            query,
            operation_name: params.name.clone(),
            variables,
        }
    }
}

/// Variables sent with an operation.
///
/// Each declared local argument starts from its default and is overridden by the
/// supplied value; provided variables are applied last. Supplied keys the operation
/// does not declare are dropped.
pub fn operation_variables(
    operation: &NormalizationOperation,
    supplied: &Map<String, Value>,
    provided: &ProvidedVariables,
) -> Map<String, Value> {
    let mut variables: Map<String, Value> = operation
        .argument_definitions
        .iter()
        .filter_map(|definition| match definition {
            ArgumentDefinition::LocalArgument(local) => {
                let value = supplied
                    .get(&local.name)
                    .cloned()
                    .unwrap_or_else(|| local.default_value.clone());
                Some((local.name.clone(), value))
            }
            ArgumentDefinition::RootArgument(_) => None,
        })
        .collect();

    variables.extend(provided.values());
    variables
}

impl ConcreteRequest {
    pub fn request_body(
        &self,
        supplied: &Map<String, Value>,
        registry: &ProvidedVariableRegistry,
    ) -> Result<GraphQLRequestBody, ArtifactError> {
        let provided = self.provided_variables(registry)?;
        let variables = operation_variables(&self.operation, supplied, &provided);
        Ok(GraphQLRequestBody::new(&self.params, variables))
    }

    pub fn provided_variables(
        &self,
        registry: &ProvidedVariableRegistry,
    ) -> Result<ProvidedVariables, ArtifactError> {
        resolve_provided(&self.params, registry)
    }
}

impl<Q: OperationType> PreloadableConcreteRequest<Q> {
    /// Body for preloading `Q`; without the operation's argument definitions the
    /// variables are sent as given, plus provided variables
    pub fn request_body(
        &self,
        variables: &Q::Variables,
        registry: &ProvidedVariableRegistry,
    ) -> Result<GraphQLRequestBody, ArtifactError> {
        let mut map = match serde_json::to_value(variables).map_err(ArtifactError::Variables)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ArtifactError::VariablesNotAnObject),
        };

        map.extend(resolve_provided(&self.params, registry)?.values());
        Ok(GraphQLRequestBody::new(&self.params, map))
    }
}

fn resolve_provided(
    params: &RequestParameters,
    registry: &ProvidedVariableRegistry,
) -> Result<ProvidedVariables, ArtifactError> {
    match &params.provided_variables {
        Some(declared) => ProvidedVariables::resolve(declared, registry),
        None => Ok(ProvidedVariables::default()),
    }
}
