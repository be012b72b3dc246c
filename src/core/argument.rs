//! Field arguments and argument definitions shared by reader and normalization nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::node_kind::NodeKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Argument {
    Literal(LiteralArgument),
    Variable(VariableArgument),
    ListValue(ListValueArgument),
    ObjectValue(ObjectValueArgument),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArgument {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableArgument {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub variable_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListValueArgument {
    pub name: String,
    pub items: Vec<Option<Argument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectValueArgument {
    pub name: String,
    pub fields: Vec<Argument>,
}

impl Argument {
    pub fn kind(&self) -> NodeKind {
        match self {
            Argument::Literal(_) => NodeKind::Literal,
            Argument::Variable(_) => NodeKind::Variable,
            Argument::ListValue(_) => NodeKind::ListValue,
            Argument::ObjectValue(_) => NodeKind::ObjectValue,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Argument::Literal(arg) => &arg.name,
            Argument::Variable(arg) => &arg.name,
            Argument::ListValue(arg) => &arg.name,
            Argument::ObjectValue(arg) => &arg.name,
        }
    }

    /// Arguments nested directly inside this one
    pub fn children(&self) -> Vec<&Argument> {
        match self {
            Argument::Literal(_) | Argument::Variable(_) => vec![],
            Argument::ListValue(list) => list.items.iter().flatten().collect(),
            Argument::ObjectValue(object) => object.fields.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ArgumentDefinition {
    LocalArgument(LocalArgument),
    RootArgument(RootArgument),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalArgument {
    pub name: String,
    #[serde(default)]
    pub default_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootArgument {
    pub name: String,
}

impl ArgumentDefinition {
    pub fn kind(&self) -> NodeKind {
        match self {
            ArgumentDefinition::LocalArgument(_) => NodeKind::LocalArgument,
            ArgumentDefinition::RootArgument(_) => NodeKind::RootArgument,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ArgumentDefinition::LocalArgument(arg) => &arg.name,
            ArgumentDefinition::RootArgument(arg) => &arg.name,
        }
    }
}
