use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::NewsApiConfig;
use crate::error::{AppError, Result};
use crate::models::Article;

use super::{ArticleSource, SearchFilter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticlesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    code: Option<String>,
    message: Option<String>,
}

/// Client for the News API v2 (`newsapi.org`).
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &NewsApiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("news-reports/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let url = Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)?;
        Ok(url)
    }

    async fn fetch_articles(&self, url: Url) -> Result<Vec<Article>> {
        tracing::debug!(%url, "Querying News API");
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error bodies usually carry a code and message worth surfacing
            let detail = match parse_articles(&body) {
                Err(AppError::NewsApi(msg)) => msg,
                _ => body,
            };
            return Err(AppError::NewsApi(format!("HTTP {}: {}", status, detail)));
        }

        parse_articles(&body)
    }
}

/// Decode a News API response body, turning `"status": "error"` into an error.
fn parse_articles(body: &str) -> Result<Vec<Article>> {
    let response: ArticlesResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(AppError::NewsApi(format!(
            "{}: {}",
            response.code.as_deref().unwrap_or("unknown"),
            response.message.as_deref().unwrap_or("no message")
        )));
    }
    Ok(response.articles)
}

impl ArticleSource for NewsApiClient {
    async fn top_headlines(&self, source_id: &str) -> Result<Vec<Article>> {
        let url = self.endpoint("top-headlines", &[("sources", source_id)])?;
        self.fetch_articles(url).await
    }

    async fn everything(&self, source_id: &str, filter: SearchFilter<'_>) -> Result<Vec<Article>> {
        let query = match filter {
            SearchFilter::Title(term) => ("qInTitle", term),
            SearchFilter::FullText(term) => ("q", term),
        };
        let url = self.endpoint("everything", &[("sources", source_id), query])?;
        self.fetch_articles(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> NewsApiClient {
        let config = NewsApiConfig {
            api_key: None,
            base_url: base_url.to_string(),
            timeout_secs: 5,
        };
        NewsApiClient::new(&config, "key".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_params() {
        let client = client("https://newsapi.org/v2/");
        let url = client
            .endpoint("everything", &[("sources", "cbc-news"), ("q", "maple leafs")])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?sources=cbc-news&q=maple+leafs"
        );
    }

    #[test]
    fn test_parse_ok_response_with_nulls() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": {"id": "cbc-news", "name": "CBC News"}, "author": "A1",
                 "title": "T1", "description": null, "url": "https://cbc.ca/1",
                 "content": "C1"},
                {"title": "T2"}
            ]
        }"#;

        let articles = parse_articles(body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("T1"));
        assert_eq!(articles[0].author.as_deref(), Some("A1"));
        assert_eq!(articles[0].description, None);
        assert_eq!(articles[1].content, None);
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;

        let err = parse_articles(body).unwrap_err();
        match err {
            AppError::NewsApi(msg) => assert!(msg.starts_with("apiKeyInvalid")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_empty_article_list() {
        let body = r#"{"status": "ok", "totalResults": 0, "articles": []}"#;
        assert!(parse_articles(body).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = client("http://127.0.0.1:9");
        let err = client.top_headlines("cnn").await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }
}
