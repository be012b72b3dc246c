//! Typed model of compiled GraphQL artifacts and the operations built on it

pub mod argument;
pub mod artifact_client;
pub mod artifact_store;
pub mod concrete;
pub mod error;
pub mod input_type;
pub mod node_kind;
pub mod normalization;
pub mod payload;
pub mod provided_variables;
pub mod reader;
pub mod request_parameters;
pub mod visitor;
