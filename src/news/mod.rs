use std::future::Future;

use crate::error::Result;
use crate::models::Article;

mod client;
#[cfg(test)]
pub mod stub;

pub use client::NewsApiClient;

/// Restricts an `everything` query to one kind of match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter<'a> {
    /// Term must appear in the article title.
    Title(&'a str),
    /// Term may appear in the title or body.
    FullText(&'a str),
}

/// Anything that can answer headline and search queries for a news source.
pub trait ArticleSource {
    fn top_headlines(&self, source_id: &str) -> impl Future<Output = Result<Vec<Article>>> + Send;

    fn everything(
        &self,
        source_id: &str,
        filter: SearchFilter<'_>,
    ) -> impl Future<Output = Result<Vec<Article>>> + Send;
}
