// File: ./src/cli.rs
// Command line flags, input reading and the import entry point

use crate::client::ClickUpClient;
use crate::config::Config;
use crate::importer::{DEFAULT_PREFIX, ImportOptions, ImportSummary, Importer};
use crate::model::ChecklistDocument;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_INPUT: &str = "input/tasks.md";

/// Where the Markdown comes from. `-` selects stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl FromStr for InputSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl InputSource {
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read Markdown from stdin")?;
                Ok(buf)
            }
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read Markdown from {:?}", path)),
        }
    }

    /// Base name used in generated task descriptions.
    pub fn display_name(&self) -> String {
        match self {
            Self::Stdin => "stdin".to_string(),
            Self::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mdload",
    version,
    about = "Create ClickUp subtasks from a Markdown checklist."
)]
pub struct Cli {
    /// Path to the Markdown file; use '-' to read from stdin
    #[arg(long = "md", value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub input: InputSource,

    /// Override the ClickUp list id from the environment
    #[arg(long, value_name = "ID")]
    pub list_id: Option<String>,

    /// Optional top-level parent task to nest all categories under
    #[arg(long, value_name = "TITLE")]
    pub root_parent: Option<String>,

    /// Prefix for each category task name
    #[arg(long, value_name = "STR", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Print the actions without calling the ClickUp API
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn import_options(&self, config: &Config) -> ImportOptions {
        ImportOptions {
            prefix: self.prefix.clone(),
            root_parent: self.root_parent.clone().filter(|t| !t.is_empty()),
            closed_status: config.closed_status.clone(),
            source_name: self.input.display_name(),
        }
    }
}

/// Parses `markdown` and imports it. Fails when no category was found.
pub async fn import(markdown: &str, cli: &Cli, config: &Config) -> Result<ImportSummary> {
    let doc = ChecklistDocument::parse(markdown);
    if doc.is_empty() {
        bail!("No categories/items parsed from the Markdown input.");
    }
    tracing::debug!(
        "Parsed {} categories, {} items ({} checked) from {}",
        doc.len(),
        doc.item_count(),
        doc.checked_count(),
        cli.input
    );

    let options = cli.import_options(config);
    if cli.dry_run {
        return Importer::<ClickUpClient>::dry_run(&options).run(&doc).await;
    }

    let token = config.require_token()?;
    let list_id = config.resolve_list_id(cli.list_id.as_deref())?;
    let client = ClickUpClient::new(&config.api_url, token, list_id)
        .context("Failed to set up the ClickUp client")?;
    Importer::new(&client, &options).run(&doc).await
}

pub async fn run(cli: &Cli, config: &Config) -> Result<ImportSummary> {
    let markdown = cli.input.read()?;
    import(&markdown, cli, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mdload"]).unwrap();
        assert_eq!(cli.input, InputSource::File(PathBuf::from(DEFAULT_INPUT)));
        assert_eq!(cli.prefix, "Packing - ");
        assert_eq!(cli.list_id, None);
        assert_eq!(cli.root_parent, None);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "mdload",
            "--md",
            "-",
            "--list-id",
            "901",
            "--root-parent",
            "Philly Wake Trip - Packing",
            "--prefix",
            "",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.input, InputSource::Stdin);
        assert_eq!(cli.list_id.as_deref(), Some("901"));
        assert_eq!(cli.root_parent.as_deref(), Some("Philly Wake Trip - Packing"));
        assert_eq!(cli.prefix, "");
        assert!(cli.dry_run);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(InputSource::Stdin.display_name(), "stdin");
        assert_eq!(
            InputSource::File(PathBuf::from("input/tasks.md")).display_name(),
            "tasks.md"
        );
    }

    #[test]
    fn test_import_options() {
        let cli = Cli::try_parse_from(["mdload", "--md", "lists/trip.md", "--root-parent", ""])
            .unwrap();
        let config = Config {
            closed_status: Some("complete".to_string()),
            ..Config::default()
        };

        let options = cli.import_options(&config);
        assert_eq!(options.root_parent, None);
        assert_eq!(options.closed_status.as_deref(), Some("complete"));
        assert_eq!(options.source_name, "trip.md");

        // Any non-empty title is kept as given, whitespace included.
        let cli = Cli::try_parse_from(["mdload", "--root-parent", " "]).unwrap();
        assert_eq!(cli.import_options(&config).root_parent.as_deref(), Some(" "));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = InputSource::File(PathBuf::from("does/not/exist.md"));
        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("exist.md"));
    }

    #[tokio::test]
    async fn test_no_categories_is_fatal() {
        let cli = Cli::try_parse_from(["mdload", "--dry-run"]).unwrap();
        let err = import("# Just a heading\n  - [ ] orphan\n", &cli, &Config::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No categories/items parsed from the Markdown input."
        );
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_credentials() {
        let cli = Cli::try_parse_from(["mdload", "--dry-run"]).unwrap();
        let summary = import("- [ ] Clothes\n  - [x] Socks\n", &cli, &Config::default())
            .await
            .unwrap();
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.subtasks, 1);
        // No closed status configured.
        assert_eq!(summary.closed, 0);
    }

    #[tokio::test]
    async fn test_real_run_requires_token() {
        let cli = Cli::try_parse_from(["mdload", "--list-id", "901"]).unwrap();
        let err = import("- [ ] Clothes\n", &cli, &Config::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CLICKUP_TOKEN"));
    }

    #[tokio::test]
    async fn test_real_run_requires_list_id() {
        let cli = Cli::try_parse_from(["mdload"]).unwrap();
        let config = Config {
            token: Some("pk_1".to_string()),
            ..Config::default()
        };
        let err = import("- [ ] Clothes\n", &cli, &config).await.unwrap_err();
        assert!(err.to_string().contains("--list-id"));
    }
}
