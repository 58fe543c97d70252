//! CLI commands and argument parsing

use crate::request::FilterCondition;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Drain paginated list operations of REST management APIs
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service definition (built-in name or YAML file)
    #[arg(short, long, global = true, default_value = "forecast")]
    pub service: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse the process arguments, exiting on error
    ///
    /// Unlike [`Parser::parse`], this records the command-line order of
    /// `--filter` and `--exclude`.
    pub fn parse_ordered() -> Self {
        Self::try_parse_ordered_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse arguments, recording the order of `--filter` and `--exclude`
    pub fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        if let (Commands::List(list), Some(("list", sub))) =
            (&mut cli.command, matches.subcommand())
        {
            list.filter_order = filter_order(sub);
        }
        Ok(cli)
    }
}

/// Conditions of all filter flags, sorted by argv position
fn filter_order(matches: &ArgMatches) -> Vec<FilterCondition> {
    let positions = |id: &str, condition: FilterCondition| {
        matches
            .indices_of(id)
            .into_iter()
            .flatten()
            .map(move |index| (index, condition))
    };
    let mut order: Vec<_> = positions("filters", FilterCondition::Include)
        .chain(positions("excludes", FilterCondition::Exclude))
        .collect();
    order.sort_by_key(|(index, _)| *index);
    order.into_iter().map(|(_, condition)| condition).collect()
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in services
    Services,

    /// List the operations of the selected service
    Operations,

    /// Validate the service definition
    Validate,

    /// Run a list operation and print its items
    List(ListArgs),
}

/// Arguments of `pagewalk list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Operation name (e.g. ListDatasets)
    pub operation: String,

    /// Keep items matching KEY=VALUE (repeatable)
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Drop items matching KEY=VALUE (repeatable)
    #[arg(long = "exclude", value_name = "KEY=VALUE")]
    pub excludes: Vec<String>,

    /// Page-size hint sent with every request
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Resume from a token printed by an earlier run
    #[arg(long, conflicts_with = "resume")]
    pub starting_token: Option<String>,

    /// Fetch a single page and print its continuation token
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// Field to emit: a result field name, `*` for whole responses, or a `$.` JSONPath
    #[arg(long)]
    pub select: Option<String>,

    /// Stop with an error after this many pages
    #[arg(long, conflicts_with = "no_page_limit")]
    pub max_pages: Option<usize>,

    /// Disable the page safety bound
    #[arg(long)]
    pub no_page_limit: bool,

    /// Override the service base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Extra request header KEY=VALUE (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Token store file (JSON) for MANUAL runs
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Start from the token saved in the state file
    #[arg(long, requires = "state")]
    pub resume: bool,

    /// Command-line order of `filters` and `excludes`
    #[arg(skip)]
    pub filter_order: Vec<FilterCondition>,
}

impl ListArgs {
    /// Filter flags with their conditions, in command-line order
    ///
    /// Without a recorded order (arguments built by hand, or parsed with
    /// [`Parser::parse`]) includes come before excludes.
    pub fn ordered_filters(&self) -> Vec<(FilterCondition, &str)> {
        let mut includes = self.filters.iter();
        let mut excludes = self.excludes.iter();

        let order = if self.filter_order.len() == self.filters.len() + self.excludes.len() {
            self.filter_order.clone()
        } else {
            let mut order = vec![FilterCondition::Include; self.filters.len()];
            order.resize(order.len() + self.excludes.len(), FilterCondition::Exclude);
            order
        };

        order
            .into_iter()
            .filter_map(|condition| {
                let pair = match condition {
                    FilterCondition::Include => includes.next(),
                    FilterCondition::Exclude => excludes.next(),
                }?;
                Some((condition, pair.as_str()))
            })
            .collect()
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "-s",
            "forecast",
            "list",
            "ListExplainabilities",
            "--filter",
            "Status=ACTIVE",
            "--exclude",
            "ResourceArn=arn:x",
            "--max-results",
            "10",
            "--no-auto-iteration",
            "--select",
            "*",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.operation, "ListExplainabilities");
        assert_eq!(args.filters, vec!["Status=ACTIVE"]);
        assert_eq!(args.excludes, vec!["ResourceArn=arn:x"]);
        assert_eq!(args.max_results, Some(10));
        assert!(args.no_auto_iteration);
        assert_eq!(args.select.as_deref(), Some("*"));
    }

    #[test]
    fn test_filters_keep_command_line_order() {
        let cli = Cli::try_parse_ordered_from([
            "pagewalk",
            "list",
            "ListDatasets",
            "--exclude",
            "DatasetArn=arn:a",
            "--filter",
            "Status=ACTIVE",
            "--exclude",
            "DatasetArn=arn:b",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(
            args.ordered_filters(),
            vec![
                (FilterCondition::Exclude, "DatasetArn=arn:a"),
                (FilterCondition::Include, "Status=ACTIVE"),
                (FilterCondition::Exclude, "DatasetArn=arn:b"),
            ]
        );
    }

    #[test]
    fn test_unordered_parse_puts_includes_first() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "list",
            "ListDatasets",
            "--exclude",
            "DatasetArn=arn:a",
            "--filter",
            "Status=ACTIVE",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert!(args.filter_order.is_empty());
        assert_eq!(
            args.ordered_filters(),
            vec![
                (FilterCondition::Include, "Status=ACTIVE"),
                (FilterCondition::Exclude, "DatasetArn=arn:a"),
            ]
        );
    }

    #[test]
    fn test_resume_requires_state() {
        assert!(Cli::try_parse_from(["pagewalk", "list", "ListDatasets", "--resume"]).is_err());
        assert!(Cli::try_parse_from([
            "pagewalk",
            "list",
            "ListDatasets",
            "--resume",
            "--state",
            "tokens.json"
        ])
        .is_ok());
    }

    #[test]
    fn test_starting_token_conflicts_with_resume() {
        let result = Cli::try_parse_from([
            "pagewalk",
            "list",
            "ListDatasets",
            "--state",
            "tokens.json",
            "--resume",
            "--starting-token",
            "T1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pagewalk", "operations", "-f", "pretty", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Operations));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        assert_eq!(cli.service, "forecast");
    }
}
