//! Built-in service definitions embedded in the binary
//!
//! Lets users write `--service forecast` instead of a path to a YAML file.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in service YAML definitions
pub static BUILTIN_SERVICES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // Forecasting
        m.insert("forecast", include_str!("../services/forecast.yaml"));
        m.insert("amazon-forecast", include_str!("../services/forecast.yaml"));

        m
    });

/// Get a built-in service by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SERVICES.get(name).copied()
}

/// Check if a service name is a built-in service
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SERVICES.contains_key(name)
}

/// List all built-in service names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["forecast"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_service_from_str;

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("forecast"));
        assert!(is_builtin("amazon-forecast"));
        assert!(!is_builtin("stripe"));
        assert!(get_builtin("nope").is_none());
    }

    #[test]
    fn test_all_builtins_parse() {
        for name in list_builtin() {
            let yaml = get_builtin(name).expect("listed builtin exists");
            let def = load_service_from_str(yaml)
                .unwrap_or_else(|e| panic!("builtin '{name}' failed to load: {e}"));
            assert_eq!(def.name, name);
        }
    }

    #[test]
    fn test_forecast_explainabilities_operation() {
        let def = load_service_from_str(get_builtin("forecast").unwrap()).unwrap();
        let op = def.operation("ListExplainabilities").unwrap();
        assert_eq!(op.items_field, "Explainabilities");
        assert_eq!(op.max_results.as_ref().unwrap().max, Some(100));
        assert_eq!(
            op.filters.as_ref().unwrap().keys,
            vec!["ResourceArn".to_string(), "Status".to_string()]
        );
        assert_eq!(
            op.headers.get("X-Amz-Target").map(String::as_str),
            Some("AmazonForecast.ListExplainabilities")
        );
    }
}
