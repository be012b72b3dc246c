//! Reader artifacts: how to read store data back into the shape of a selection

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::argument::{Argument, ArgumentDefinition};
use crate::core::node_kind::{NodeKind, kind_tag};

kind_tag!(FragmentTag, "Fragment");
kind_tag!(InlineDataFragmentTag, "InlineDataFragment");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderFragment {
    pub kind: FragmentTag,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub abstract_key: Option<String>,
    #[serde(default)]
    pub metadata: Option<ReaderFragmentMetadata>,
    #[serde(default)]
    pub argument_definitions: Vec<ArgumentDefinition>,
    pub selections: Vec<ReaderSelection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderFragmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Vec<ConnectionMetadata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refetch: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_client_edges: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_on_field_error: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionDirection {
    Forward,
    Backward,
    Bidirectional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionMetadata {
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    pub direction: ConnectionDirection,
    #[serde(default)]
    pub path: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// A fragment read through `readInlineData`, its selections live on the spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderInlineDataFragment {
    pub kind: InlineDataFragmentTag,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReaderSelection {
    Condition(ReaderCondition),
    ClientExtension(ReaderClientExtension),
    Connection(ReaderConnection),
    FragmentSpread(ReaderFragmentSpread),
    InlineDataFragmentSpread(ReaderInlineDataFragmentSpread),
    InlineFragment(ReaderInlineFragment),
    LinkedField(ReaderLinkedField),
    ScalarField(ReaderScalarField),
    FlightField(ReaderScalarField),
    ModuleImport(ReaderModuleImport),
    RequiredField(ReaderRequiredField),
    RelayResolver(ReaderResolver),
    RelayLiveResolver(ReaderResolver),
    ClientEdgeToServerObject(ReaderClientEdgeToServerObject),
    ClientEdgeToClientObject(ReaderClientEdgeToClientObject),
    ActorChange(ReaderActorChange),
    AliasedFragmentSpread(ReaderAliasedSpread),
    AliasedInlineFragmentSpread(ReaderAliasedSpread),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderCondition {
    pub condition: String,
    pub passing_value: bool,
    pub selections: Vec<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderClientExtension {
    pub selections: Vec<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConnection {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    pub edges: Box<ReaderSelection>,
    pub page_info: Box<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderFragmentSpread {
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderInlineDataFragmentSpread {
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub argument_definitions: Vec<ArgumentDefinition>,
    pub selections: Vec<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderInlineFragment {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub abstract_key: Option<String>,
    pub selections: Vec<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderLinkedField {
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
    pub selections: Vec<ReaderSelection>,
}

/// Shape shared by scalar and flight fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderScalarField {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub storage_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderModuleImport {
    pub document_name: String,
    pub fragment_name: String,
    pub fragment_prop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_module_provider: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequiredFieldAction {
    None,
    Log,
    Throw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderRequiredField {
    pub field: Box<ReaderSelection>,
    pub action: RequiredFieldAction,
    pub path: String,
}

/// Shape shared by plain and live resolvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderResolver {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    #[serde(default)]
    pub fragment: Option<Box<ReaderSelection>>,
    pub path: String,
    pub resolver_module: String,
    #[serde(default)]
    pub is_output_type: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderClientEdgeToServerObject {
    /// Name of the request fetched to resolve the edge
    pub operation: String,
    pub backing_field: Box<ReaderSelection>,
    pub linked_field: Box<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderClientEdgeToClientObject {
    #[serde(default)]
    pub concrete_type: Option<String>,
    pub backing_field: Box<ReaderSelection>,
    pub linked_field: Box<ReaderSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderActorChange {
    #[serde(default)]
    pub alias: Option<String>,
    pub name: String,
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<Argument>>,
    pub fragment_spread: Box<ReaderSelection>,
}

/// Shape shared by aliased fragment spreads and aliased inline fragments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderAliasedSpread {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub abstract_key: Option<String>,
    pub fragment: Box<ReaderSelection>,
}

impl ReaderSelection {
    pub fn kind(&self) -> NodeKind {
        match self {
            ReaderSelection::Condition(_) => NodeKind::Condition,
            ReaderSelection::ClientExtension(_) => NodeKind::ClientExtension,
            ReaderSelection::Connection(_) => NodeKind::Connection,
            ReaderSelection::FragmentSpread(_) => NodeKind::FragmentSpread,
            ReaderSelection::InlineDataFragmentSpread(_) => NodeKind::InlineDataFragmentSpread,
            ReaderSelection::InlineFragment(_) => NodeKind::InlineFragment,
            ReaderSelection::LinkedField(_) => NodeKind::LinkedField,
            ReaderSelection::ScalarField(_) => NodeKind::ScalarField,
            ReaderSelection::FlightField(_) => NodeKind::FlightField,
            ReaderSelection::ModuleImport(_) => NodeKind::ModuleImport,
            ReaderSelection::RequiredField(_) => NodeKind::RequiredField,
            ReaderSelection::RelayResolver(_) => NodeKind::RelayResolver,
            ReaderSelection::RelayLiveResolver(_) => NodeKind::RelayLiveResolver,
            ReaderSelection::ClientEdgeToServerObject(_) => NodeKind::ClientEdgeToServerObject,
            ReaderSelection::ClientEdgeToClientObject(_) => NodeKind::ClientEdgeToClientObject,
            ReaderSelection::ActorChange(_) => NodeKind::ActorChange,
            ReaderSelection::AliasedFragmentSpread(_) => NodeKind::AliasedFragmentSpread,
            ReaderSelection::AliasedInlineFragmentSpread(_) => {
                NodeKind::AliasedInlineFragmentSpread
            }
        }
    }

    /// Selections nested directly under this one, in document order
    pub fn children(&self) -> Vec<&ReaderSelection> {
        match self {
            ReaderSelection::Condition(node) => node.selections.iter().collect(),
            ReaderSelection::ClientExtension(node) => node.selections.iter().collect(),
            ReaderSelection::Connection(node) => vec![&*node.edges, &*node.page_info],
            ReaderSelection::InlineDataFragmentSpread(node) => node.selections.iter().collect(),
            ReaderSelection::InlineFragment(node) => node.selections.iter().collect(),
            ReaderSelection::LinkedField(node) => node.selections.iter().collect(),
            ReaderSelection::RequiredField(node) => vec![&*node.field],
            ReaderSelection::RelayResolver(node) | ReaderSelection::RelayLiveResolver(node) => {
                node.fragment.iter().map(|fragment| &**fragment).collect()
            }
            ReaderSelection::ClientEdgeToServerObject(node) => {
                vec![&*node.backing_field, &*node.linked_field]
            }
            ReaderSelection::ClientEdgeToClientObject(node) => {
                vec![&*node.backing_field, &*node.linked_field]
            }
            ReaderSelection::ActorChange(node) => vec![&*node.fragment_spread],
            ReaderSelection::AliasedFragmentSpread(node)
            | ReaderSelection::AliasedInlineFragmentSpread(node) => vec![&*node.fragment],
            ReaderSelection::FragmentSpread(_)
            | ReaderSelection::ScalarField(_)
            | ReaderSelection::FlightField(_)
            | ReaderSelection::ModuleImport(_) => vec![],
        }
    }

    pub fn args(&self) -> &[Argument] {
        let args = match self {
            ReaderSelection::Connection(node) => &node.args,
            ReaderSelection::FragmentSpread(node) => &node.args,
            ReaderSelection::InlineDataFragmentSpread(node) => &node.args,
            ReaderSelection::LinkedField(node) => &node.args,
            ReaderSelection::ScalarField(node) | ReaderSelection::FlightField(node) => &node.args,
            ReaderSelection::RelayResolver(node) | ReaderSelection::RelayLiveResolver(node) => {
                &node.args
            }
            ReaderSelection::ActorChange(node) => &node.args,
            _ => return &[],
        };
        args.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment_json() -> Value {
        json!({
            "argumentDefinitions": [
                {"kind": "LocalArgument", "name": "size", "defaultValue": 32}
            ],
            "kind": "Fragment",
            "metadata": {"plural": true, "relayTestingSelectionTypeInfo": {}},
            "name": "UserAvatar_users",
            "selections": [
                {
                    "alias": null,
                    "args": null,
                    "kind": "ScalarField",
                    "name": "id",
                    "storageKey": null
                },
                {
                    "alias": "avatar",
                    "args": [{"kind": "Variable", "name": "size", "variableName": "size"}],
                    "concreteType": "Image",
                    "kind": "LinkedField",
                    "name": "profilePicture",
                    "plural": false,
                    "selections": [
                        {
                            "alias": null,
                            "args": null,
                            "kind": "ScalarField",
                            "name": "uri",
                            "storageKey": null
                        }
                    ],
                    "storageKey": null
                },
                {
                    "kind": "Condition",
                    "condition": "showName",
                    "passingValue": true,
                    "selections": [
                        {"args": null, "kind": "FragmentSpread", "name": "UserName_user"}
                    ]
                }
            ],
            "type": "User",
            "abstractKey": null
        })
    }

    #[test]
    fn test_parse_fragment() {
        let fragment: ReaderFragment = serde_json::from_value(fragment_json()).unwrap();
        assert_eq!(fragment.name, "UserAvatar_users");
        assert_eq!(fragment.type_, "User");
        assert_eq!(fragment.selections.len(), 3);

        let metadata = fragment.metadata.as_ref().unwrap();
        assert_eq!(metadata.plural, Some(true));
        assert!(metadata.extra.contains_key("relayTestingSelectionTypeInfo"));

        let linked = &fragment.selections[1];
        assert_eq!(linked.kind(), NodeKind::LinkedField);
        assert_eq!(linked.args().len(), 1);
        assert_eq!(linked.children().len(), 1);

        let condition = &fragment.selections[2];
        assert_eq!(condition.children()[0].kind(), NodeKind::FragmentSpread);
    }

    #[test]
    fn test_fragment_rejects_foreign_kind() {
        let mut json = fragment_json();
        json["kind"] = json!("Operation");
        let err = serde_json::from_value::<ReaderFragment>(json).unwrap_err();
        assert!(err.to_string().contains("expected kind `Fragment`"));
    }

    #[test]
    fn test_fragment_serializes_kind() {
        let fragment: ReaderFragment = serde_json::from_value(fragment_json()).unwrap();
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["kind"], json!("Fragment"));
        assert_eq!(json["selections"][1]["kind"], json!("LinkedField"));
    }

    #[test]
    fn test_required_and_resolver_children() {
        let json = json!([
            {
                "kind": "RequiredField",
                "action": "THROW",
                "path": "user.name",
                "field": {
                    "alias": null,
                    "args": null,
                    "kind": "ScalarField",
                    "name": "name",
                    "storageKey": null
                }
            },
            {
                "kind": "RelayLiveResolver",
                "alias": null,
                "args": null,
                "name": "counter",
                "path": "counter",
                "resolverModule": "CounterResolver",
                "fragment": {"args": null, "kind": "FragmentSpread", "name": "CounterResolver"}
            },
            {
                "kind": "ModuleImport",
                "documentName": "Feed_story",
                "fragmentName": "PlainStory_story",
                "fragmentPropName": "story"
            }
        ]);

        let selections: Vec<ReaderSelection> = serde_json::from_value(json).unwrap();
        match &selections[0] {
            ReaderSelection::RequiredField(required) => {
                assert_eq!(required.action, RequiredFieldAction::Throw)
            }
            other => panic!("Expected required field, got {:?}", other.kind()),
        }
        assert_eq!(selections[0].children()[0].kind(), NodeKind::ScalarField);
        assert_eq!(selections[1].kind(), NodeKind::RelayLiveResolver);
        assert_eq!(selections[1].children()[0].kind(), NodeKind::FragmentSpread);
        assert!(selections[2].children().is_empty());
    }

    #[test]
    fn test_normalization_kind_is_not_a_reader_selection() {
        let json = json!({"kind": "TypeDiscriminator", "abstractKey": "__isNode"});
        assert!(serde_json::from_value::<ReaderSelection>(json).is_err());
    }

    #[test]
    fn test_inline_data_fragment() {
        let fragment: ReaderInlineDataFragment =
            serde_json::from_value(json!({"kind": "InlineDataFragment", "name": "Story_data"}))
                .unwrap();
        assert_eq!(fragment.name, "Story_data");
    }
}
