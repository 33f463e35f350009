// ABOUTME: HttpClient implementation backed by reqwest.
// ABOUTME: Builds the default client from a GateConfig.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{HttpClient, HttpResponse};
use crate::config::GateConfig;
use crate::error::DispatchError;

/// Build a reqwest client using the timeout and user agent from `config`.
pub fn build_client(config: &GateConfig) -> Result<reqwest::Client, DispatchError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

#[async_trait]
impl HttpResponse for reqwest::Response {
    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    async fn text(self) -> Result<String, DispatchError> {
        Ok(reqwest::Response::text(self).await?)
    }

    async fn bytes(self) -> Result<Vec<u8>, DispatchError> {
        Ok(reqwest::Response::bytes(self).await?.to_vec())
    }
}

#[async_trait]
impl HttpClient for reqwest::Client {
    type Response = reqwest::Response;

    async fn get(&self, url: &str) -> Result<reqwest::Response, DispatchError> {
        Ok(reqwest::Client::get(self, url).send().await?)
    }

    async fn post(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<reqwest::Response, DispatchError> {
        Ok(reqwest::Client::post(self, url).json(payload).send().await?)
    }
}
