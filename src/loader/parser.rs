//! YAML parser for service definitions
//!
//! Parses and validates service YAML files.
//! Supports both built-in services (by name) and custom YAML files (by path).

use crate::error::{Error, Result};
use crate::loader::types::{ListOperation, ServiceDefinition};
use crate::services;
use crate::types::{Method, ParamLocation};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service definition from a name or file path
///
/// A bare name without path separators or a YAML extension is looked up
/// among the built-in services first.
///
/// # Examples
///
/// ```ignore
/// let service = load_service("forecast")?;
/// let service = load_service("./my-service.yaml")?;
/// ```
pub fn load_service(path: impl AsRef<Path>) -> Result<ServiceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = services::get_builtin(&path_str) {
            return load_service_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            let builtin_list = services::list_builtin().join(", ");
            Error::config(format!(
                "Service '{}' not found. Built-in services: {}. Or provide a path to a YAML file.",
                path.display(),
                builtin_list
            ))
        } else {
            Error::config(format!(
                "Failed to read service file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_service_from_str(&content)
}

/// Load a service definition from a YAML string
pub fn load_service_from_str(yaml: &str) -> Result<ServiceDefinition> {
    let def: ServiceDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse service YAML: {e}")))?;

    validate_service(&def)?;
    Ok(def)
}

/// Validate a service definition
fn validate_service(def: &ServiceDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Service name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Service base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url)
        .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", def.base_url)))?;

    if def.http.timeout_secs == 0 {
        return Err(Error::config("http.timeout_secs must be positive"));
    }
    if def.http.rate_limit_rps == Some(0) {
        return Err(Error::config(
            "http.rate_limit_rps must be positive (omit it to disable rate limiting)",
        ));
    }

    if def.operations.is_empty() {
        return Err(Error::config("Service must have at least one operation"));
    }

    let names: HashSet<_> = def.operations.iter().map(|op| &op.name).collect();
    if names.len() != def.operations.len() {
        return Err(Error::config("Duplicate operation names found"));
    }

    for op in &def.operations {
        validate_operation(op)?;
    }

    Ok(())
}

/// Validate a single list operation
fn validate_operation(op: &ListOperation) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if !op.path.starts_with('/') {
        return Err(Error::config(format!(
            "Operation '{}' path must start with '/': {}",
            op.name, op.path
        )));
    }

    if op.items_field.is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' items_field cannot be empty",
            op.name
        )));
    }

    if !op.result_fields.is_empty() && !op.result_fields.contains(&op.items_field) {
        return Err(Error::config(format!(
            "Operation '{}' result_fields must include items_field '{}'",
            op.name, op.items_field
        )));
    }

    if op.uses_body() && op.method != Method::POST {
        return Err(Error::config(format!(
            "Operation '{}' sends a JSON body and must use POST",
            op.name
        )));
    }

    if let Some(token) = &op.token {
        if token.request_param.is_empty() || token.response_path.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' token parameters cannot be empty",
                op.name
            )));
        }
    }

    if let Some(max_results) = &op.max_results {
        if max_results.max == Some(0) {
            return Err(Error::config(format!(
                "Operation '{}' max_results.max must be positive",
                op.name
            )));
        }
        if let Some(token) = &op.token {
            if max_results.location == token.location && max_results.param == token.request_param
            {
                return Err(Error::config(format!(
                    "Operation '{}' uses '{}' for both token and max_results",
                    op.name, max_results.param
                )));
            }
        }
    }

    if let Some(filters) = &op.filters {
        if filters.include == filters.exclude {
            return Err(Error::config(format!(
                "Operation '{}' include and exclude conditions must differ",
                op.name
            )));
        }
        if let Some(token) = &op.token {
            if token.location == ParamLocation::Body && token.request_param == filters.param {
                return Err(Error::config(format!(
                    "Operation '{}' uses '{}' for both token and filters",
                    op.name, filters.param
                )));
            }
        }
    }

    Ok(())
}
