//! The closed catalog of node kinds a compiled artifact may carry in its `kind` field

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;

macro_rules! node_kinds {
    ($($variant:ident => $constant:literal, $value:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($variant,)+
        }

        impl NodeKind {
            /// Every kind, in catalog order
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)+];

            /// The literal written into an artifact's `kind` field
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $value,)+
                }
            }

            /// The symbolic name of the catalog entry, e.g. `LINKED_FIELD`
            pub fn constant_name(&self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $constant,)+
                }
            }
        }

        impl FromStr for NodeKind {
            type Err = UnknownNodeKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(NodeKind::$variant),)+
                    other => Err(UnknownNodeKind(other.to_string())),
                }
            }
        }
    };
}

node_kinds! {
    ActorChange => "ACTOR_CHANGE", "ActorChange";
    Condition => "CONDITION", "Condition";
    ClientComponent => "CLIENT_COMPONENT", "ClientComponent";
    ClientEdgeToServerObject => "CLIENT_EDGE_TO_SERVER_OBJECT", "ClientEdgeToServerObject";
    ClientEdgeToClientObject => "CLIENT_EDGE_TO_CLIENT_OBJECT", "ClientEdgeToClientObject";
    ClientExtension => "CLIENT_EXTENSION", "ClientExtension";
    Defer => "DEFER", "Defer";
    Connection => "CONNECTION", "Connection";
    FlightField => "FLIGHT_FIELD", "FlightField";
    Fragment => "FRAGMENT", "Fragment";
    FragmentSpread => "FRAGMENT_SPREAD", "FragmentSpread";
    InlineDataFragmentSpread => "INLINE_DATA_FRAGMENT_SPREAD", "InlineDataFragmentSpread";
    InlineDataFragment => "INLINE_DATA_FRAGMENT", "InlineDataFragment";
    InlineFragment => "INLINE_FRAGMENT", "InlineFragment";
    LinkedField => "LINKED_FIELD", "LinkedField";
    LinkedHandle => "LINKED_HANDLE", "LinkedHandle";
    Literal => "LITERAL", "Literal";
    ListValue => "LIST_VALUE", "ListValue";
    LocalArgument => "LOCAL_ARGUMENT", "LocalArgument";
    ModuleImport => "MODULE_IMPORT", "ModuleImport";
    AliasedFragmentSpread => "ALIASED_FRAGMENT_SPREAD", "AliasedFragmentSpread";
    AliasedInlineFragmentSpread => "ALIASED_INLINE_FRAGMENT_SPREAD", "AliasedInlineFragmentSpread";
    RelayResolver => "RELAY_RESOLVER", "RelayResolver";
    RelayLiveResolver => "RELAY_LIVE_RESOLVER", "RelayLiveResolver";
    RequiredField => "REQUIRED_FIELD", "RequiredField";
    ObjectValue => "OBJECT_VALUE", "ObjectValue";
    Operation => "OPERATION", "Operation";
    Request => "REQUEST", "Request";
    RootArgument => "ROOT_ARGUMENT", "RootArgument";
    ScalarField => "SCALAR_FIELD", "ScalarField";
    ScalarHandle => "SCALAR_HANDLE", "ScalarHandle";
    SplitOperation => "SPLIT_OPERATION", "SplitOperation";
    Stream => "STREAM", "Stream";
    TypeDiscriminator => "TYPE_DISCRIMINATOR", "TypeDiscriminator";
    UpdatableQuery => "UPDATABLE_QUERY", "UpdatableQuery";
    Variable => "VARIABLE", "Variable";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown node kind: {0}")]
pub struct UnknownNodeKind(pub String);

impl NodeKind {
    /// Whether an artifact file may have this kind at its root
    pub fn is_generated_node(&self) -> bool {
        matches!(
            self,
            NodeKind::Request
                | NodeKind::Fragment
                | NodeKind::InlineDataFragment
                | NodeKind::SplitOperation
                | NodeKind::UpdatableQuery
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}

/// Declares a zero-sized type standing for one fixed `kind` literal.
///
/// Top-level artifact structs carry one of these in their `kind` field so that a struct
/// decoded on its own (outside of a tagged enum) still refuses a foreign discriminant.
macro_rules! kind_tag {
    ($name:ident, $literal:literal) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl $name {
            pub const KIND: &'static str = $literal;
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(Self::KIND)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                if value == Self::KIND {
                    Ok($name)
                } else {
                    Err(<D::Error as serde::de::Error>::custom(format!(
                        "expected kind `{}`, found `{}`",
                        Self::KIND,
                        value
                    )))
                }
            }
        }
    };
}

pub(crate) use kind_tag;
