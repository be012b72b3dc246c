//! Normalization artifacts: how a server response is written into the store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::core::argument::{Argument, ArgumentDefinition};
use crate::core::node_kind::{NodeKind, kind_tag};

kind_tag!(OperationTag, "Operation");
kind_tag!(SplitOperationTag, "SplitOperation");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationOperation {
    pub kind: OperationTag,
    pub name: String,
    #[serde(default)]
    pub argument_definitions: Vec<ArgumentDefinition>,
    pub selections: Vec<NormalizationSelection>,
    /// Abstract type name to the concrete client types implementing it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_abstract_types: Option<BTreeMap<String, Vec<String>>>,
}

/// Normalization plan for a `@module` fragment, loaded separately from its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationSplitOperation {
    pub kind: SplitOperationTag,
    pub name: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_definitions: Option<Vec<ArgumentDefinition>>,
    pub selections: Vec<NormalizationSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NormalizationSelection {
    Condition(NormalizationCondition),
    ClientComponent(NormalizationClientComponent),
    ClientExtension(NormalizationClientExtension),
    Defer(NormalizationIncremental),
    Stream(NormalizationIncremental),
    FlightField(NormalizationScalarField),
    InlineFragment(NormalizationInlineFragment),
    LinkedField(NormalizationLinkedField),
    ScalarField(NormalizationScalarField),
    LinkedHandle(NormalizationHandle),
    ScalarHandle(NormalizationHandle),
    ModuleImport(NormalizationModuleImport),
    TypeDiscriminator(NormalizationTypeDiscriminator),
    ActorChange(NormalizationActorChange),
    RelayResolver(NormalizationResolver),
    RelayLiveResolver(NormalizationResolver),
    ClientEdgeToClientObject(NormalizationClientEdge),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationCondition {
    pub condition: String,
    pub passing_value: bool,
    pub selections: Vec<NormalizationSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationClientComponent {
    pub fragment: Box<NormalizationSplitOperation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationClientExtension {
    pub selections: Vec<NormalizationSelection>,
}

/// Shape shared by `@defer` and `@stream`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationIncremental {
    /// Variable controlling whether the payload is delivered incrementally
    #[serde(rename = "if", default)]
    pub if_: Option<String>,
    pub label: String,
    pub selections: Vec<NormalizationSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationInlineFragment {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub abstract_key: Option<String>,
    pub selections: Vec<NormalizationSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationLinkedField {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub concrete_type: Option<String>,
    #[serde(default)]
    pub plural: bool,
    pub selections: Vec<NormalizationSelection>,
}

/// Shape shared by scalar and flight fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationScalarField {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub storage_key: Option<String>,
}

/// Shape shared by linked and scalar handles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationHandle {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    pub handle: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_key: Option<Argument>,
    #[serde(default)]
    pub filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_args: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationModuleImport {
    pub document_name: String,
    pub fragment_name: String,
    pub fragment_prop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_module_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_module_provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationTypeDiscriminator {
    pub abstract_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationActorChange {
    pub linked_field: Box<NormalizationSelection>,
}

/// Shape shared by plain and live resolvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationResolver {
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub fragment: Option<Box<NormalizationSelection>>,
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub is_output_type: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationClientEdge {
    pub backing_field: Box<NormalizationSelection>,
    pub linked_field: Box<NormalizationSelection>,
}

impl NormalizationSelection {
    pub fn kind(&self) -> NodeKind {
        match self {
            NormalizationSelection::Condition(_) => NodeKind::Condition,
            NormalizationSelection::ClientComponent(_) => NodeKind::ClientComponent,
            NormalizationSelection::ClientExtension(_) => NodeKind::ClientExtension,
            NormalizationSelection::Defer(_) => NodeKind::Defer,
            NormalizationSelection::Stream(_) => NodeKind::Stream,
            NormalizationSelection::FlightField(_) => NodeKind::FlightField,
            NormalizationSelection::InlineFragment(_) => NodeKind::InlineFragment,
            NormalizationSelection::LinkedField(_) => NodeKind::LinkedField,
            NormalizationSelection::ScalarField(_) => NodeKind::ScalarField,
            NormalizationSelection::LinkedHandle(_) => NodeKind::LinkedHandle,
            NormalizationSelection::ScalarHandle(_) => NodeKind::ScalarHandle,
            NormalizationSelection::ModuleImport(_) => NodeKind::ModuleImport,
            NormalizationSelection::TypeDiscriminator(_) => NodeKind::TypeDiscriminator,
            NormalizationSelection::ActorChange(_) => NodeKind::ActorChange,
            NormalizationSelection::RelayResolver(_) => NodeKind::RelayResolver,
            NormalizationSelection::RelayLiveResolver(_) => NodeKind::RelayLiveResolver,
            NormalizationSelection::ClientEdgeToClientObject(_) => {
                NodeKind::ClientEdgeToClientObject
            }
        }
    }

    /// Selections nested directly under this one. A client component's split
    /// operation is not included, it is a separate node.
    pub fn children(&self) -> Vec<&NormalizationSelection> {
        match self {
            NormalizationSelection::Condition(node) => node.selections.iter().collect(),
            NormalizationSelection::ClientExtension(node) => node.selections.iter().collect(),
            NormalizationSelection::Defer(node) | NormalizationSelection::Stream(node) => {
                node.selections.iter().collect()
            }
            NormalizationSelection::InlineFragment(node) => node.selections.iter().collect(),
            NormalizationSelection::LinkedField(node) => node.selections.iter().collect(),
            NormalizationSelection::ActorChange(node) => vec![&*node.linked_field],
            NormalizationSelection::RelayResolver(node)
            | NormalizationSelection::RelayLiveResolver(node) => {
                node.fragment.iter().map(|fragment| &**fragment).collect()
            }
            NormalizationSelection::ClientEdgeToClientObject(node) => {
                vec![&*node.backing_field, &*node.linked_field]
            }
            NormalizationSelection::ClientComponent(_)
            | NormalizationSelection::FlightField(_)
            | NormalizationSelection::ScalarField(_)
            | NormalizationSelection::LinkedHandle(_)
            | NormalizationSelection::ScalarHandle(_)
            | NormalizationSelection::ModuleImport(_)
            | NormalizationSelection::TypeDiscriminator(_) => vec![],
        }
    }

    pub fn args(&self) -> Vec<&Argument> {
        let args = match self {
            NormalizationSelection::LinkedField(node) => node.args.as_deref(),
            NormalizationSelection::ScalarField(node)
            | NormalizationSelection::FlightField(node) => node.args.as_deref(),
            NormalizationSelection::RelayResolver(node)
            | NormalizationSelection::RelayLiveResolver(node) => node.args.as_deref(),
            NormalizationSelection::LinkedHandle(handle)
            | NormalizationSelection::ScalarHandle(handle) => {
                return handle
                    .args
                    .iter()
                    .flatten()
                    .chain(handle.handle_args.iter().flatten())
                    .chain(handle.dynamic_key.iter())
                    .collect();
            }
            _ => None,
        };
        args.unwrap_or_default().iter().collect()
    }
}
