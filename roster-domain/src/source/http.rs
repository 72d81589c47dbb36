use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{DataSource, RawRecord};
use crate::error::{DomainError, DomainResult};

/// 远程 JSON 数据源：GET 一个返回 JSON 数组的地址
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_initial_entities(&self) -> DomainResult<Vec<RawRecord>> {
        debug!(url = %self.url, "fetching initial entities");
        let body: serde_json::Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body {
            serde_json::Value::Array(records) => Ok(records),
            other => Err(DomainError::network(format!(
                "expected a JSON array from {}, got {}",
                self.url,
                match other {
                    serde_json::Value::Object(_) => "an object",
                    _ => "a scalar",
                }
            ))),
        }
    }
}
