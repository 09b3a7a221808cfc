use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;

use crate::domain::ports::MenuSource;
use crate::utils::error::Result;

/// 菜單網站需要固定的 cookie 才會回傳內容
pub struct HttpMenuFetcher {
    client: Client,
    cookie: String,
}

impl HttpMenuFetcher {
    pub fn new(cookie: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            cookie: cookie.into(),
        })
    }
}

#[async_trait]
impl MenuSource for HttpMenuFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, &self.cookie)
            .send()
            .await?;

        tracing::debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }
}
