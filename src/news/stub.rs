//! In-memory article source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Article;

use super::{ArticleSource, SearchFilter};

/// Serves canned articles and records every query as `kind:source[:term]`.
#[derive(Default)]
pub struct StubSource {
    pub headlines: Vec<Article>,
    pub title: HashMap<String, Vec<Article>>,
    pub full_text: HashMap<String, Vec<Article>>,
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl StubSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(AppError::NewsApi("rateLimited: too many requests".to_string()));
        }
        Ok(())
    }
}

impl ArticleSource for StubSource {
    async fn top_headlines(&self, source_id: &str) -> Result<Vec<Article>> {
        self.record(format!("headlines:{source_id}"))?;
        Ok(self.headlines.clone())
    }

    async fn everything(&self, source_id: &str, filter: SearchFilter<'_>) -> Result<Vec<Article>> {
        let (kind, term, results) = match filter {
            SearchFilter::Title(term) => ("title", term, &self.title),
            SearchFilter::FullText(term) => ("all", term, &self.full_text),
        };
        self.record(format!("{kind}:{source_id}:{term}"))?;
        Ok(results.get(term).cloned().unwrap_or_default())
    }
}
