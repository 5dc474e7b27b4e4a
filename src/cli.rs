//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::NewReport;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// News API key, overriding the config file
    #[arg(long, env = "NEWS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Save a new report definition
    Create {
        /// Label shown when listing reports
        #[arg(short, long)]
        name: String,

        /// News source id, e.g. cbc-news, cnn, espn
        #[arg(short, long)]
        source: String,

        /// Search term matched against article titles (repeatable)
        #[arg(short, long = "title-term")]
        title_terms: Vec<String>,

        /// Search term matched against titles and bodies (repeatable)
        #[arg(short, long = "all-term")]
        all_terms: Vec<String>,
    },

    /// List saved reports
    List,

    /// Generate a report
    Print {
        /// Report number as shown by `list`
        id: i64,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// The report definition described by `create` arguments, terms kept in order.
pub fn new_report(
    name: &str,
    source: &str,
    title_terms: &[String],
    all_terms: &[String],
) -> NewReport {
    let report = title_terms
        .iter()
        .fold(NewReport::new(name, source), |report, term| report.title_term(term));
    all_terms
        .iter()
        .fold(report, |report, term| report.all_term(term))
}
