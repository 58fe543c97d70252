//! YAML Loader module
//!
//! Parse service definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ServiceDefinition` - Declarative service specification
//! - `ListOperation` - How one paginated list operation looks on the wire
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_service, load_service_from_str};
pub use types::{
    FilterDefinition, HttpDefinition, ListOperation, MaxResultsDefinition, ServiceDefinition,
    TokenDefinition,
};
