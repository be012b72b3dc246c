//! HTTP handlers for the artifact inspection API

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    response::Json,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, warn};

use crate::{
    AppState,
    core::{
        artifact_store::Diagnostic, concrete::GeneratedNode, payload::GraphQLRequestBody,
        visitor,
    },
    web::{
        errors::ApiError,
        params::{ArtifactListParams, merge_parameters},
        types::{ArtifactSummary, CensusResponse, KindInfo, ReloadResponse},
        utils::{kind_catalog, summarize},
    },
};

#[axum_macros::debug_handler]
pub async fn get_kinds_handler() -> Json<Vec<KindInfo>> {
    Json(kind_catalog())
}

#[axum_macros::debug_handler]
pub async fn list_artifacts_handler(
    State(app_state): State<AppState>,
    params: Result<Query<ArtifactListParams>, QueryRejection>,
) -> Result<Json<Vec<ArtifactSummary>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let store = app_state.store.read().await;

    let summaries = store
        .iter()
        .filter(|artifact| params.matches(artifact.node.name(), artifact.node.kind()))
        .map(summarize)
        .collect::<Vec<_>>();
    Ok(Json(summaries))
}

#[axum_macros::debug_handler]
pub async fn get_artifact_handler(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GeneratedNode>, ApiError> {
    let store = app_state.store.read().await;
    store
        .get(&name)
        .map(|artifact| Json(artifact.node.clone()))
        .ok_or(ApiError::NotFound(name))
}

#[axum_macros::debug_handler]
pub async fn get_census_handler(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CensusResponse>, ApiError> {
    let store = app_state.store.read().await;
    let artifact = store.get(&name).ok_or_else(|| ApiError::NotFound(name.clone()))?;

    let census = visitor::census(&artifact.node);
    Ok(Json(CensusResponse {
        total: census.total(),
        counts: census.counts,
        name,
    }))
}

#[axum_macros::debug_handler]
pub async fn get_diagnostics_handler(State(app_state): State<AppState>) -> Json<Vec<Diagnostic>> {
    Json(app_state.store.read().await.diagnostics())
}

#[axum_macros::debug_handler]
pub async fn request_payload_handler(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    Query(query_params): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Result<Json<GraphQLRequestBody>, ApiError> {
    let store = app_state.store.read().await;
    let artifact = store.get(&name).ok_or_else(|| ApiError::NotFound(name.clone()))?;
    let request = artifact.node.as_request().ok_or_else(|| {
        ApiError::InvalidQuery(format!(
            "'{name}' is a {}, payloads can only be built for a Request",
            artifact.node.kind()
        ))
    })?;

    let variable_types = visitor::variable_types(&request.operation);
    let supplied = merge_parameters(
        &query_params,
        body.as_ref().map(|json| &json.0),
        &variable_types,
    )?;

    match request.request_body(&supplied, &app_state.provided_variables) {
        Ok(payload) => {
            debug!(request = %name, variables = payload.variables.len(), "built request payload");
            Ok(Json(payload))
        }
        Err(e) => {
            warn!(request = %name, error = %e, "could not build request payload");
            Err(e.into())
        }
    }
}

#[axum_macros::debug_handler]
pub async fn reload_handler(
    State(app_state): State<AppState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    match app_state.reload().await {
        Ok(artifacts) => {
            let load_errors = app_state.store.read().await.load_errors().len();
            Ok(Json(ReloadResponse {
                artifacts,
                load_errors,
            }))
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "reload failed");
            Err(ApiError::SourceUnavailable(format!("{e:#}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::artifact_store::ArtifactStore;
    use crate::core::concrete::tests::{PROFILE_TEXT, profile_request_json};
    use crate::core::provided_variables::ProvidedVariableRegistry;
    use crate::web::router;
    use crate::{AppState, ArtifactSource};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use tower::ServiceExt;

    use super::GeneratedNode;

    fn card_fragment() -> Value {
        json!({
            "kind": "Fragment",
            "name": "ProfileCard_user",
            "type": "User",
            "abstractKey": null,
            "metadata": null,
            "argumentDefinitions": [],
            "selections": [
                {
                    "alias": null,
                    "args": null,
                    "kind": "ScalarField",
                    "name": "name",
                    "storageKey": null
                }
            ]
        })
    }

    fn test_state(artifact_dir: PathBuf) -> AppState {
        let store = ArtifactStore::from_nodes([
            GeneratedNode::from_value(profile_request_json()).unwrap(),
            GeneratedNode::from_value(card_fragment()).unwrap(),
        ])
        .unwrap();
        AppState::new(
            store,
            ArtifactSource::LocalDir,
            artifact_dir,
            None,
            ProvidedVariableRegistry::new(),
        )
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_kinds_route() {
        let (status, body) = get(test_state(PathBuf::from("unused")), "/api/kinds").await;
        assert_eq!(status, StatusCode::OK);
        let kinds = body.as_array().unwrap();
        assert!(kinds.contains(&json!({"constant": "SPLIT_OPERATION", "value": "SplitOperation"})));
    }

    #[tokio::test]
    async fn test_list_artifacts_filters() {
        let state = test_state(PathBuf::from("unused"));

        let (status, body) = get(state.clone(), "/api/artifacts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = get(state.clone(), "/api/artifacts?kind=Fragment").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "ProfileCard_user");
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = get(state.clone(), "/api/artifacts?q=profilequery").await;
        assert_eq!(body[0]["operationKind"], "query");

        let (status, body) = get(state.clone(), "/api/artifacts?q=bad%20name").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (status, _) = get(state, "/api/artifacts?kind=Bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_artifact_and_census() {
        let state = test_state(PathBuf::from("unused"));

        let (status, body) = get(state.clone(), "/api/artifacts/ProfileCard_user").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, card_fragment());

        let (status, body) = get(state.clone(), "/api/artifacts/ProfileQuery/census").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "ProfileQuery");
        assert_eq!(body["counts"]["Request"], 1);
        assert_eq!(body["counts"]["ScalarField"], 2);

        let (status, body) = get(state, "/api/artifacts/Missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Resource not found: Missing");
    }

    #[tokio::test]
    async fn test_diagnostics_route() {
        let (status, body) = get(test_state(PathBuf::from("unused")), "/api/diagnostics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_payload_from_query_string() {
        let (status, body) = get(
            test_state(PathBuf::from("unused")),
            "/api/requests/ProfileQuery/payload?id=4&ignored=1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "query": PROFILE_TEXT,
                "operationName": "ProfileQuery",
                "variables": {"id": "4"}
            })
        );
    }

    #[tokio::test]
    async fn test_payload_from_body() {
        let request = Request::post("/api/requests/ProfileQuery/payload?id=4")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id": "7"}"#))
            .unwrap();

        let (status, body) = send(test_state(PathBuf::from("unused")), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variables"], json!({"id": "7"}));
    }

    #[tokio::test]
    async fn test_payload_rejects_non_requests() {
        let state = test_state(PathBuf::from("unused"));

        let (status, body) = get(state.clone(), "/api/requests/ProfileCard_user/payload").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("is a Fragment"));

        let (status, _) = get(state, "/api/requests/Missing/payload").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reload_swaps_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ProfileCard_user.graphql.json"),
            card_fragment().to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join("Broken.graphql.json"), "{").unwrap();
        let state = test_state(dir.path().to_path_buf());

        let request = Request::post("/api/reload").body(Body::empty()).unwrap();
        let (status, body) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"artifacts": 1, "loadErrors": 1}));

        let (status, _) = get(state, "/api/artifacts/ProfileQuery").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reload_missing_directory() {
        let state = test_state(PathBuf::from("/definitely/not/here"));

        let request = Request::post("/api/reload").body(Body::empty()).unwrap();
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = get(state, "/api/artifacts/ProfileQuery").await;
        assert_eq!(status, StatusCode::OK);
    }
}
