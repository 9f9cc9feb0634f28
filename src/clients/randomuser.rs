use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::models::user::UserRecord;

/// Envelope returned by the random-user generator service.
#[derive(Debug, Deserialize)]
pub struct RandomUserResponse {
    pub results: Vec<UserRecord>,
    #[serde(default)]
    pub info: BatchInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchInfo {
    pub seed: Option<String>,
    pub results: Option<u32>,
    pub page: Option<u32>,
    pub version: Option<String>,
}

#[derive(Clone)]
pub struct RandomUserClient {
    client: Client,
    base_url: String,
}

impl RandomUserClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// One fetch of a `count`-sized batch. Any transport failure, non-2xx
    /// status, or undecodable body is an error; there is no partial result.
    pub async fn fetch(&self, count: u32) -> Result<RandomUserResponse> {
        let url = format!(
            "{}/?results={}",
            self.base_url.trim_end_matches('/'),
            count
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "random-user API error: {} - {}",
                status,
                body
            ));
        }

        let batch: RandomUserResponse = response.json().await?;
        Ok(batch)
    }
}
