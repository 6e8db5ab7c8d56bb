/// CLI argument definitions for the `dm` command.
///
/// Defines all subcommands, their arguments, and long help text
/// using the `clap` derive macros.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::cli_help;

/// Top-level CLI parser with global settings and a subcommand selector.
#[derive(Parser)]
#[command(name = "dm", version, about = "Double materiality rating tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Rating lens: stakeholder, impact, or financial (default: from config)
    #[arg(long, global = true, value_parser = ["stakeholder", "impact", "financial"])]
    pub rating_type: Option<String>,

    /// Config file (default: ./materiality.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Submissions API endpoint (overrides config and MATERIALITY_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Report id (overrides config and MATERIALITY_REPORT_ID)
    #[arg(long, global = true)]
    pub report_id: Option<String>,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// A grouped submissions file plus the output format.
#[derive(Args)]
pub struct GroupedArgs {
    /// Grouped submissions JSON (the fetchSubmissionsGrouped payload)
    pub grouped: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recompute the average and print every respondent's ratings
    #[command(long_about = cli_help::AVERAGE)]
    Average {
        #[command(flatten)]
        args: GroupedArgs,
    },

    /// Classify one data source into the four quadrants
    #[command(long_about = cli_help::MATRIX)]
    Matrix {
        #[command(flatten)]
        args: GroupedArgs,

        /// Respondent label as printed by `dm average`, a submission id, or "Average"
        #[arg(long, default_value = "Average")]
        source: String,
    },

    /// Plot topics by impact score against financial score
    Materiality {
        /// Grouped IMPACT submissions JSON
        impact: PathBuf,

        /// Grouped FINANCIAL submissions JSON
        financial: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a blank rating template for a list of entities
    Template {
        /// JSON array of entities: [{"id", "name", "dimension"?}]
        entities: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a filled rating CSV into a submission
    #[command(long_about = cli_help::IMPORT)]
    Import {
        /// Filled CSV file
        file: PathBuf,

        /// Respondent id the submission belongs to
        #[arg(long)]
        respondent_id: String,

        /// Respondent display name (recorded as the uploader)
        #[arg(long)]
        uploader: String,

        /// Submission type (default: derived from the rating lens)
        #[arg(long = "type", value_parser = ["internal", "stakeholder", "impact", "financial"])]
        submission_type: Option<String>,

        /// Add the submission to this local grouped JSON file
        #[arg(long, conflicts_with = "submit")]
        into: Option<PathBuf>,

        /// Submission id to use with --into (default: local-<n>)
        #[arg(long, requires = "into")]
        submission_id: Option<String>,

        /// Send the submission to the configured API
        #[arg(long)]
        submit: bool,
    },

    /// Fetch the grouped submissions from the API
    Fetch {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Save the grouped payload to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a submission through the API
    Delete {
        /// Submission id
        id: String,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
