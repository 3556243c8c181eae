//! HTTP client for the Quotes JSON API

use anyhow::{Context, Result};
use quotes_common::{Quote, QuoteDraft, QuoteId};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for communicating with the Quotes web server
pub struct QuotesClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuotesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if the server is healthy
    pub async fn health_check(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn list(&self) -> Result<Vec<Quote>> {
        let resp = self.http.get(self.url("/api/quotes")).send().await?;
        decode(resp).await
    }

    pub async fn get(&self, id: QuoteId) -> Result<Quote> {
        let resp = self
            .http
            .get(self.url(&format!("/api/quotes/{}", id)))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn create(&self, draft: &QuoteDraft) -> Result<Quote> {
        let resp = self
            .http
            .post(self.url("/api/quotes"))
            .json(draft)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn replace(&self, id: QuoteId, draft: &QuoteDraft) -> Result<Quote> {
        let resp = self
            .http
            .put(self.url(&format!("/api/quotes/{}", id)))
            .json(draft)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete(&self, id: QuoteId) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/quotes/{}", id)))
            .send()
            .await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Err(api_error(resp).await)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    resp.json::<T>().await.context("invalid response body")
}

async fn api_error(resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(body) => anyhow::anyhow!("{} ({})", body.error, status),
        Err(_) => anyhow::anyhow!("server returned {}", status),
    }
}
