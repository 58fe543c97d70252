//! CLI runner - executes commands

use crate::boundary::{CancelSignal, InterruptGuard};
use crate::cli::commands::{Cli, Commands, ListArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::{load_service, ServiceDefinition};
use crate::pager::{list_operation, PagerConfig, DEFAULT_MAX_PAGES};
use crate::request::{Filter, FilterCondition, ListParams};
use crate::services::list_builtin;
use crate::state::StateManager;
use crate::types::IterationMode;
use serde_json::{json, Value};
use std::io::{ErrorKind, Write};
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Services => self.services(),
            Commands::Operations => self.operations(),
            Commands::Validate => self.validate(),
            Commands::List(args) => self.list(args).await,
        }
    }

    /// Load service definition
    fn load_service(&self) -> Result<ServiceDefinition> {
        load_service(&self.cli.service)
    }

    /// List built-in services
    fn services(&self) -> Result<()> {
        for name in list_builtin() {
            let service = load_service(name)?;
            let open = self.output_message(&json!({
                "type": "SERVICE",
                "name": name,
                "version": service.version,
                "base_url": service.base_url,
                "operations": service.operations.len()
            }))?;
            if !open {
                break;
            }
        }
        Ok(())
    }

    /// List the operations of the selected service
    fn operations(&self) -> Result<()> {
        let service = self.load_service()?;
        for op in &service.operations {
            let open = self.output_message(&json!({
                "type": "OPERATION",
                "name": op.name,
                "description": op.description,
                "items_field": op.items_field,
                "paginated": op.token.is_some(),
                "max_results": op.max_results.as_ref().and_then(|m| m.max),
                "filter_keys": op.filters.as_ref().map(|f| &f.keys)
            }))?;
            if !open {
                break;
            }
        }
        Ok(())
    }

    /// Validate the service definition
    fn validate(&self) -> Result<()> {
        let service = self.load_service()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Service '{}' v{} is valid with {} operations",
                    service.name,
                    service.version,
                    service.operations.len()
                )
            }
        }))?;

        Ok(())
    }

    /// Run a list operation
    async fn list(&self, args: &ListArgs) -> Result<()> {
        let service = self.load_service()?;
        let op = service.operation(&args.operation).cloned().ok_or_else(|| {
            Error::invalid_argument(format!(
                "Service '{}' has no operation '{}' (available: {})",
                service.name,
                args.operation,
                service.operation_names().join(", ")
            ))
        })?;

        let client = Arc::new(build_client(&service, args)?);
        let state = match &args.state {
            Some(path) => StateManager::open(path).await?,
            None => StateManager::in_memory(),
        };

        let mut params = build_params(args)?;
        if args.resume {
            match state.get_token(&service.name, &op.name).await {
                Some(token) => {
                    info!("Resuming {} from saved token", op.name);
                    params = params.starting_token(token);
                }
                None => info!("No saved token for {}, starting from the first page", op.name),
            }
        }
        debug!(
            "{}: {} include / {} exclude filters, mode {:?}",
            op.name,
            params.count(FilterCondition::Include),
            params.count(FilterCondition::Exclude),
            params.mode
        );

        let max_pages = if args.no_page_limit {
            None
        } else {
            Some(args.max_pages.unwrap_or(DEFAULT_MAX_PAGES))
        };

        let signal = CancelSignal::new();
        let _guard = InterruptGuard::install(signal.clone());

        let mut pager = list_operation(client, &op, &params, args.select.as_deref(), signal)?
            .with_config(PagerConfig::default().max_pages(max_pages))?;

        let mut items = 0usize;
        while let Some(page) = pager.next_page().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    // Keep the resume point of an interrupted run
                    if e.is_cancelled() && args.state.is_some() {
                        if let Some(token) = pager.final_token() {
                            state
                                .set_token(&service.name, &op.name, token.to_string())
                                .await?;
                        }
                    }
                    return Err(e);
                }
            };
            items += page.items.len();
            for item in &page.items {
                if !self.output_message(item)? {
                    // Reader went away; the saved token is left as it was
                    info!("Output closed after page {}, stopping", page.number);
                    return Ok(());
                }
            }
        }

        let pages = pager.iteration().pages_fetched;
        info!("{}: {} items from {} pages", op.name, items, pages);

        if params.mode.is_manual() {
            let token = pager.final_token();
            self.output_message(&json!({
                "type": "NEXT_TOKEN",
                "next_token": token
            }))?;
            match token {
                Some(token) => {
                    state
                        .set_token(&service.name, &op.name, token.to_string())
                        .await?;
                }
                None => state.clear_token(&service.name, &op.name).await?,
            }
        } else {
            state.clear_token(&service.name, &op.name).await?;
        }

        Ok(())
    }

    /// Output a message; `false` once stdout has been closed
    fn output_message(&self, msg: &Value) -> Result<bool> {
        write_message(&mut std::io::stdout().lock(), msg, self.cli.format)
    }
}

/// Write one message as a line
///
/// Returns `Ok(false)` when the reader has closed the pipe.
pub fn write_message<W: Write>(out: &mut W, msg: &Value, format: OutputFormat) -> Result<bool> {
    let line = match format {
        OutputFormat::Json => serde_json::to_string(msg)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
    };
    match writeln!(out, "{line}").and_then(|()| out.flush()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("stdout closed");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Build list parameters from command-line arguments
pub fn build_params(args: &ListArgs) -> Result<ListParams> {
    let mut params = ListParams::new();

    for (condition, pair) in args.ordered_filters() {
        params = params.filter(Filter::parse(condition, pair)?);
    }
    if let Some(max_results) = args.max_results {
        params = params.max_results(max_results);
    }
    if let Some(token) = &args.starting_token {
        params = params.starting_token(token);
    }

    Ok(params.mode(if args.no_auto_iteration {
        IterationMode::Manual
    } else {
        IterationMode::Auto
    }))
}

/// Build the HTTP client for a service, applying endpoint and header overrides
pub fn build_client(service: &ServiceDefinition, args: &ListArgs) -> Result<HttpClient> {
    let base_url = args.endpoint.as_deref().unwrap_or(&service.base_url);
    url::Url::parse(base_url)?;

    let mut config = HttpClientConfig::from_definition(&service.http, base_url);
    config.default_headers.extend(service.headers.clone());
    for pair in &args.headers {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::invalid_argument(format!("Header must be KEY=VALUE, got '{pair}'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_argument(format!(
                "Header name cannot be empty in '{pair}'"
            )));
        }
        config
            .default_headers
            .insert(key.to_string(), value.trim().to_string());
    }

    HttpClient::with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_service;

    fn args(operation: &str) -> ListArgs {
        ListArgs {
            operation: operation.to_string(),
            ..ListArgs::default()
        }
    }

    #[test]
    fn test_build_params_defaults() {
        let params = build_params(&args("ListDatasets")).unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn test_build_params_keeps_filter_order() {
        let args = ListArgs {
            filters: vec!["Status=ACTIVE".into()],
            excludes: vec!["DatasetArn=arn:a=b".into()],
            max_results: Some(50),
            starting_token: Some("T1".into()),
            no_auto_iteration: true,
            ..args("ListDatasets")
        };
        let params = build_params(&args).unwrap();

        assert_eq!(
            params.filters,
            vec![
                Filter::include("Status", "ACTIVE"),
                Filter::exclude("DatasetArn", "arn:a=b")
            ]
        );
        assert_eq!(params.max_results, Some(50));
        assert_eq!(params.starting_token.as_deref(), Some("T1"));
        assert!(params.mode.is_manual());
    }

    #[test]
    fn test_build_params_follows_recorded_order() {
        let args = ListArgs {
            filters: vec!["Status=ACTIVE".into()],
            excludes: vec!["DatasetArn=arn:a".into(), "DatasetArn=arn:b".into()],
            filter_order: vec![
                FilterCondition::Exclude,
                FilterCondition::Include,
                FilterCondition::Exclude,
            ],
            ..args("ListDatasets")
        };
        let params = build_params(&args).unwrap();

        assert_eq!(
            params.filters,
            vec![
                Filter::exclude("DatasetArn", "arn:a"),
                Filter::include("Status", "ACTIVE"),
                Filter::exclude("DatasetArn", "arn:b"),
            ]
        );
    }

    #[test]
    fn test_build_params_rejects_bad_filter() {
        let args = ListArgs {
            filters: vec!["Status".into()],
            ..args("ListDatasets")
        };
        assert!(matches!(
            build_params(&args),
            Err(Error::InvalidArgument { .. })
        ));
    }

    /// Writer whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_message_lines() {
        let mut out = Vec::new();
        assert!(write_message(&mut out, &json!({"a": 1}), OutputFormat::Json).unwrap());
        assert!(write_message(&mut out, &json!("b"), OutputFormat::Json).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "{\"a\":1}\n\"b\"\n");
    }

    #[test]
    fn test_write_message_stops_on_closed_pipe() {
        let open = write_message(&mut ClosedPipe, &json!({"a": 1}), OutputFormat::Pretty).unwrap();
        assert!(!open);
    }

    #[test]
    fn test_write_message_reports_other_io_errors() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_message(&mut Full, &json!(1), OutputFormat::Json).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err}");
    }

    #[test]
    fn test_build_client_overrides() {
        let service = load_service("forecast").unwrap();
        let args = ListArgs {
            endpoint: Some("http://localhost:4566".into()),
            headers: vec!["Authorization=Bearer abc".into()],
            ..args("ListDatasets")
        };
        let client = build_client(&service, &args).unwrap();
        let config = client.config();

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(
            config.default_headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/x-amz-json-1.1")
        );
    }

    #[test]
    fn test_build_client_rejects_bad_endpoint() {
        let service = load_service("forecast").unwrap();
        let args = ListArgs {
            endpoint: Some("not a url".into()),
            ..args("ListDatasets")
        };
        assert!(matches!(
            build_client(&service, &args),
            Err(Error::InvalidUrl(_))
        ));
    }
}
