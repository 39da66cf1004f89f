pub mod error;

pub use error::{FirebaseError, Result};

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// REST client for one Firebase Realtime Database.
///
/// Paths are slash-separated from the database root ("votes/daftpunk");
/// the client appends the `.json` suffix and optional `auth` param.
pub struct FirebaseClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseClient {
    pub fn new(base_url: String, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        match &self.auth_token {
            Some(token) => vec![("auth", token.clone())],
            None => vec![],
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FirebaseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    /// Read the value at `path`. A missing node comes back as JSON `null`,
    /// surfaced here as `None`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let resp = self
            .client
            .get(self.url(path))
            .query(&self.auth_query())
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let value: Option<T> = resp.json().await?;
        Ok(value)
    }

    /// Replace the value at `path` (PUT).
    pub async fn set<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let resp = self
            .client
            .put(self.url(path))
            .query(&self.auth_query())
            .json(value)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Merge `value` into the node at `path` (PATCH), leaving other
    /// children untouched.
    pub async fn update<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let resp = self
            .client
            .patch(self.url(path))
            .query(&self.auth_query())
            .json(value)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Read all children of `path`, indexed on `order_by`. The REST API
    /// returns a JSON object, which carries no order, so callers that need
    /// the `order_by` ordering must sort the result themselves.
    pub async fn scan<T: DeserializeOwned>(&self, path: &str, order_by: &str) -> Result<Vec<T>> {
        let mut query = self.auth_query();
        query.push(("orderBy", format!("\"{order_by}\"")));

        let resp = self
            .client
            .get(self.url(path))
            .query(&query)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let children: Option<HashMap<String, T>> = resp.json().await?;
        let items: Vec<T> = children.unwrap_or_default().into_values().collect();
        tracing::debug!(path, count = items.len(), "Scanned database children");
        Ok(items)
    }
}
