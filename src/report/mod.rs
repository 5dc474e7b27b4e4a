//! Report text assembly.
//!
//! A report is a chain of stages: a base headline listing wrapped by zero or
//! more search extensions. Rendering a stage renders everything it wraps
//! first, then appends its own section, so the final text reads base first,
//! outermost extension last.

use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;
use crate::models::{Article, ReportDefinition};
use crate::news::{ArticleSource, SearchFilter};

const SEPARATOR: &str = "****************************************";
const MISSING: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Top headlines for a source.
    Base { source_id: String },
    /// Appends articles whose title matches `term`.
    TitleSearch { inner: Box<Report>, term: String },
    /// Appends articles whose title or body matches `term`.
    AllSearch { inner: Box<Report>, term: String },
}

impl Report {
    pub fn base(source_id: impl Into<String>) -> Self {
        Report::Base {
            source_id: source_id.into(),
        }
    }

    pub fn with_title_search(self, term: impl Into<String>) -> Self {
        Report::TitleSearch {
            inner: Box::new(self),
            term: term.into(),
        }
    }

    pub fn with_all_search(self, term: impl Into<String>) -> Self {
        Report::AllSearch {
            inner: Box::new(self),
            term: term.into(),
        }
    }

    /// Title searches wrap the base in stored order, then all-searches wrap those.
    pub fn from_definition(definition: &ReportDefinition) -> Self {
        let report = definition
            .title_search_terms
            .iter()
            .fold(Self::base(&definition.source_id), |report, term| {
                report.with_title_search(term.as_str())
            });

        definition
            .all_search_terms
            .iter()
            .fold(report, |report, term| report.with_all_search(term.as_str()))
    }

    pub fn source_id(&self) -> &str {
        match self {
            Report::Base { source_id } => source_id,
            Report::TitleSearch { inner, .. } | Report::AllSearch { inner, .. } => inner.source_id(),
        }
    }

    /// Render the full chain. Every stage queries `source` once per call.
    pub fn render<'a, S>(&'a self, source: &'a S) -> BoxFuture<'a, Result<String>>
    where
        S: ArticleSource + Sync,
    {
        async move {
            match self {
                Report::Base { source_id } => {
                    tracing::info!(source_id = %source_id, "Building report base");
                    let articles = source.top_headlines(source_id).await?;

                    let mut text = format!("Headlines from {}\n\n", source_id);
                    push_articles(&mut text, &articles, "Description", |a| a.description.as_deref());
                    Ok(text)
                }
                Report::TitleSearch { inner, term } => {
                    tracing::info!(term = %term, "Building report title search");
                    let mut text = inner.render(source).await?;
                    let articles = source
                        .everything(inner.source_id(), SearchFilter::Title(term))
                        .await?;

                    push_search_header(&mut text, term, "in the title only");
                    push_articles(&mut text, &articles, "Author", |a| a.author.as_deref());
                    Ok(text)
                }
                Report::AllSearch { inner, term } => {
                    tracing::info!(term = %term, "Building report all search");
                    let mut text = inner.render(source).await?;
                    let articles = source
                        .everything(inner.source_id(), SearchFilter::FullText(term))
                        .await?;

                    push_search_header(&mut text, term, "in the title or content");
                    push_articles(&mut text, &articles, "Content", |a| a.content.as_deref());
                    Ok(text)
                }
            }
        }
        .boxed()
    }
}

fn push_search_header(text: &mut String, term: &str, scope: &str) {
    text.push_str(SEPARATOR);
    text.push_str(&format!("\n\nSearch results for '{}' {}: \n\n", term, scope));
}

fn push_articles(
    text: &mut String,
    articles: &[Article],
    label: &str,
    field: impl Fn(&Article) -> Option<&str>,
) {
    for article in articles {
        text.push_str(&format!(
            "Title: {}\n{}: {}\n\n",
            article.title.as_deref().unwrap_or(MISSING),
            label,
            field(article).unwrap_or(MISSING)
        ));
    }
}
