//! reqwest implementation of the chat service

use super::{parse_reply, ChatBackend, ChatRequest, UploadFile};
use crate::config::ServiceConfig;
use crate::{ParleyError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart;
use tracing::{debug, info};

/// HTTP client for the `/chat` and `/upload_image` endpoints
#[derive(Clone, Debug)]
pub struct HttpChatService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpChatService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ParleyError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        info!("Chat service at {}", config.base_url);

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post_chat(&self, query: String) -> Result<String> {
        let url = self.config.chat_url();
        debug!("POST {} ({} chars)", url, query.len());

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { query })
            .send()
            .await?;

        Self::read_reply(response).await
    }

    async fn post_image(&self, file: UploadFile) -> Result<String> {
        let url = self.config.upload_url();
        debug!("POST {} ({}, {} bytes)", url, file.name, file.bytes.len());

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;

        Self::read_reply(response).await
    }

    /// The body is decoded whatever the status; error payloads arrive on 4xx/5xx too.
    async fn read_reply(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Reply {} ({} bytes)", status, body.len());

        parse_reply(&body).map_err(|e| match e {
            ParleyError::ServiceError(msg) if !status.is_success() => {
                ParleyError::ServiceError(format!("HTTP {}: {}", status, msg))
            }
            other => other,
        })
    }
}

impl ChatBackend for HttpChatService {
    fn chat(&self, query: String) -> BoxFuture<'_, Result<String>> {
        self.post_chat(query).boxed()
    }

    fn upload_image(&self, file: UploadFile) -> BoxFuture<'_, Result<String>> {
        self.post_image(file).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_creation() {
        let service = HttpChatService::new(ServiceConfig::default()).unwrap();
        assert_eq!(service.base_url(), crate::config::DEFAULT_BASE_URL);
    }
}
