use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::db::ReportRepository;
use crate::error::{AppError, Result};
use crate::models::{NewReport, ReportDefinition};
use crate::news::{ArticleSource, NewsApiClient};
use crate::report::Report;

/// Everything an operation needs, built once at startup and passed explicitly.
pub struct App<S = NewsApiClient> {
    pub repository: ReportRepository,
    source: S,
}

impl App<NewsApiClient> {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = ReportRepository::new(&config.db_path).await?;
        let source = NewsApiClient::new(&config.news_api, config.api_key()?.to_string())?;
        Ok(Self::with_source(repository, source))
    }
}

impl<S: ArticleSource + Sync> App<S> {
    pub fn with_source(repository: ReportRepository, source: S) -> Self {
        Self { repository, source }
    }

    pub async fn create_report(&self, report: NewReport) -> Result<i64> {
        tracing::info!(name = %report.name, source_id = %report.source_id, "Creating report");
        for term in &report.title_search_terms {
            tracing::info!(term = %term, "Report title search term");
        }
        for term in &report.all_search_terms {
            tracing::info!(term = %term, "Report all search term");
        }

        let id = self.repository.create(report).await?;
        tracing::info!(id, "Finished creating report");
        Ok(id)
    }

    /// Report names in id order; position `i` holds report `i + 1`.
    pub async fn report_names(&self) -> Result<Vec<String>> {
        self.repository.list_names().await
    }

    pub async fn definition(&self, id: i64) -> Result<ReportDefinition> {
        self.repository
            .get(id)
            .await?
            .ok_or(AppError::ReportNotFound(id))
    }

    pub async fn render_report(&self, id: i64) -> Result<String> {
        let definition = self.definition(id).await?;
        tracing::info!(id, name = %definition.name, "Rendering report");

        let report = Report::from_definition(&definition);
        tracing::debug!("Base report and extensions created");
        report.render(&self.source).await
    }

    /// Render report `id` into `output`, returning how long generation took.
    pub async fn print_report(&self, id: i64, output: &Path) -> Result<Duration> {
        let start = Instant::now();

        let text = self.render_report(id).await?;
        tokio::fs::write(output, text).await?;

        let elapsed = start.elapsed();
        tracing::info!(path = %output.display(), "Report written to file");
        tracing::info!(
            "Time to generate report: {}s",
            (elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
        );
        Ok(elapsed)
    }
}
