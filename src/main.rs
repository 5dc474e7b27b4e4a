use clap::Parser;

mod app;
mod cli;
mod config;
mod db;
mod error;
mod logging;
mod models;
mod news;
mod report;

use app::App;
use cli::{Cli, Command};
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(key) = args.api_key.clone() {
        config.news_api.api_key = Some(key);
    }

    // Initialize logging sinks
    logging::init(&config.logging, &config.db_path)?;
    tracing::debug!(command = ?args.command, "Parsed command line");

    let app = App::new(&config).await?;

    match &args.command {
        Command::Create {
            name,
            source,
            title_terms,
            all_terms,
        } => {
            let report = cli::new_report(name, source, title_terms, all_terms);
            let id = app.create_report(report).await?;
            println!("Created report {}", id);
        }
        Command::List => {
            let names = app.report_names().await?;
            if names.is_empty() {
                println!("No reports saved yet");
            }
            for (i, name) in names.iter().enumerate() {
                println!("({}) {}", i + 1, name);
            }
        }
        Command::Print { id, output } => match output {
            Some(path) => {
                app.print_report(*id, path).await?;
                println!("Report written to file!");
            }
            None => print!("{}", app.render_report(*id).await?),
        },
    }

    Ok(())
}
