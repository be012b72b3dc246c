//! Depth-first traversal of generated nodes, dispatching on each node's kind

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::argument::{Argument, ArgumentDefinition};
use crate::core::concrete::GeneratedNode;
use crate::core::node_kind::NodeKind;
use crate::core::normalization::{
    NormalizationOperation, NormalizationSelection, NormalizationSplitOperation,
};
use crate::core::reader::{ReaderFragment, ReaderSelection};

/// Hooks called while walking a node. Every hook defaults to doing nothing.
pub trait Visitor {
    /// Called once for every node reached, arguments included
    fn visit_kind(&mut self, _kind: NodeKind) {}

    fn visit_argument(&mut self, _argument: &Argument) {}

    /// A named fragment spread, aliased or not
    fn visit_fragment_spread(&mut self, _name: &str) {}

    /// A `@module` import of `fragment_name`
    fn visit_module_import(&mut self, _fragment_name: &str) {}

    /// A client edge whose target is fetched by the request `operation`
    fn visit_server_edge(&mut self, _operation: &str) {}
}

pub fn walk_generated_node<V: Visitor + ?Sized>(visitor: &mut V, node: &GeneratedNode) {
    visitor.visit_kind(node.kind());
    match node {
        GeneratedNode::Request(request) => {
            walk_reader_fragment(visitor, &request.fragment);
            walk_operation(visitor, &request.operation);
        }
        GeneratedNode::Fragment(fragment) => walk_fragment_body(visitor, fragment),
        GeneratedNode::InlineDataFragment(_) => {}
        GeneratedNode::SplitOperation(operation) => walk_split_operation_body(visitor, operation),
        GeneratedNode::UpdatableQuery(query) => walk_reader_fragment(visitor, &query.fragment),
    }
}

pub fn walk_reader_fragment<V: Visitor + ?Sized>(visitor: &mut V, fragment: &ReaderFragment) {
    visitor.visit_kind(NodeKind::Fragment);
    walk_fragment_body(visitor, fragment);
}

fn walk_fragment_body<V: Visitor + ?Sized>(visitor: &mut V, fragment: &ReaderFragment) {
    walk_argument_definitions(visitor, &fragment.argument_definitions);
    for selection in &fragment.selections {
        walk_reader_selection(visitor, selection);
    }
}

pub fn walk_operation<V: Visitor + ?Sized>(visitor: &mut V, operation: &NormalizationOperation) {
    visitor.visit_kind(NodeKind::Operation);
    walk_argument_definitions(visitor, &operation.argument_definitions);
    for selection in &operation.selections {
        walk_normalization_selection(visitor, selection);
    }
}

fn walk_split_operation_body<V: Visitor + ?Sized>(
    visitor: &mut V,
    operation: &NormalizationSplitOperation,
) {
    if let Some(definitions) = &operation.argument_definitions {
        walk_argument_definitions(visitor, definitions);
    }
    for selection in &operation.selections {
        walk_normalization_selection(visitor, selection);
    }
}

fn walk_argument_definitions<V: Visitor + ?Sized>(
    visitor: &mut V,
    definitions: &[ArgumentDefinition],
) {
    for definition in definitions {
        visitor.visit_kind(definition.kind());
    }
}

pub fn walk_argument<V: Visitor + ?Sized>(visitor: &mut V, argument: &Argument) {
    visitor.visit_kind(argument.kind());
    visitor.visit_argument(argument);
    for child in argument.children() {
        walk_argument(visitor, child);
    }
}

pub fn walk_reader_selection<V: Visitor + ?Sized>(visitor: &mut V, selection: &ReaderSelection) {
    visitor.visit_kind(selection.kind());
    match selection {
        ReaderSelection::FragmentSpread(spread) => visitor.visit_fragment_spread(&spread.name),
        ReaderSelection::ModuleImport(import) => visitor.visit_module_import(&import.fragment_name),
        ReaderSelection::ClientEdgeToServerObject(edge) => {
            visitor.visit_server_edge(&edge.operation)
        }
        ReaderSelection::InlineDataFragmentSpread(spread) => {
            walk_argument_definitions(visitor, &spread.argument_definitions)
        }
        _ => {}
    }
    for argument in selection.args() {
        walk_argument(visitor, argument);
    }
    for child in selection.children() {
        walk_reader_selection(visitor, child);
    }
}

pub fn walk_normalization_selection<V: Visitor + ?Sized>(
    visitor: &mut V,
    selection: &NormalizationSelection,
) {
    visitor.visit_kind(selection.kind());
    match selection {
        NormalizationSelection::ModuleImport(import) => {
            visitor.visit_module_import(&import.fragment_name)
        }
        NormalizationSelection::ClientComponent(component) => {
            visitor.visit_kind(NodeKind::SplitOperation);
            walk_split_operation_body(visitor, &component.fragment);
        }
        _ => {}
    }
    for argument in selection.args() {
        walk_argument(visitor, argument);
    }
    for child in selection.children() {
        walk_normalization_selection(visitor, child);
    }
}

/// How many times each kind occurs in a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindCensus {
    pub counts: BTreeMap<NodeKind, usize>,
}

impl KindCensus {
    pub fn count(&self, kind: NodeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Visitor for KindCensus {
    fn visit_kind(&mut self, kind: NodeKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }
}

pub fn census(node: &GeneratedNode) -> KindCensus {
    let mut census = KindCensus::default();
    walk_generated_node(&mut census, node);
    census
}

/// Names of other artifacts a node depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct References {
    pub fragments: BTreeSet<String>,
    pub split_operations: BTreeSet<String>,
    pub operations: BTreeSet<String>,
}

impl Visitor for References {
    fn visit_fragment_spread(&mut self, name: &str) {
        self.fragments.insert(name.to_string());
    }

    fn visit_module_import(&mut self, fragment_name: &str) {
        self.split_operations.insert(split_operation_name(fragment_name));
    }

    fn visit_server_edge(&mut self, operation: &str) {
        self.operations.insert(operation.to_string());
    }
}

pub fn references(node: &GeneratedNode) -> References {
    let mut references = References::default();
    walk_generated_node(&mut references, node);
    references
}

/// Name of the split operation generated for a `@module` fragment
pub fn split_operation_name(fragment_name: &str) -> String {
    format!("{fragment_name}$normalization")
}

struct VariableTypes(BTreeMap<String, String>);

impl Visitor for VariableTypes {
    fn visit_argument(&mut self, argument: &Argument) {
        if let Argument::Variable(variable) = argument {
            if let Some(type_) = &variable.type_ {
                self.0
                    .entry(variable.variable_name.clone())
                    .or_insert_with(|| type_.clone());
            }
        }
    }
}

/// Variable name to the GraphQL type declared where the variable is used
pub fn variable_types(operation: &NormalizationOperation) -> BTreeMap<String, String> {
    let mut collector = VariableTypes(BTreeMap::new());
    walk_operation(&mut collector, operation);
    collector.0
}
