//! HTTP access to the media server: descriptions, SOAP calls and media streams

use async_trait::async_trait;
use bytes::Bytes;
use fetchtv_core::{FetchError, HttpConfig, MediaSource, MediaStream, Result};
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client for every request made to the server
///
/// Document and SOAP requests are bounded by the configured request timeout.
/// Media streams only get the connect timeout, recordings take far longer
/// than a few seconds to transfer.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout(),
        })
    }

    /// GET a document and return its body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(format!(
                "GET {} failed with status {}",
                url, status
            )));
        }

        response.text().await.map_err(|e| transport_error(url, e))
    }

    /// POST a SOAP envelope for `service_type#action` and return the response body
    pub async fn post_soap(
        &self,
        url: &str,
        service_type: &str,
        action: &str,
        body: String,
    ) -> Result<String> {
        let soap_action = format!("\"{}#{}\"", service_type, action);
        debug!("Sending SOAP action {} to {}", soap_action, url);

        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .header("Content-Type", "text/xml; charset=\"utf-8\"")
            .header("SOAPAction", soap_action)
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(FetchError::Protocol(format!(
                "{} request failed with status {}: {}",
                action, status, error_body
            )));
        }

        let text = response.text().await.map_err(|e| transport_error(url, e))?;
        debug!("SOAP response: {} bytes", text.len());
        Ok(text)
    }
}

#[async_trait]
impl MediaSource for HttpClient {
    async fn open(&self, url: &str) -> Result<Box<dyn MediaStream>> {
        debug!("Opening media stream {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(format!(
                "GET {} failed with status {}",
                url, status
            )));
        }

        Ok(Box::new(HttpMediaStream { response }))
    }
}

/// Body of a media GET, read as it arrives
pub struct HttpMediaStream {
    response: reqwest::Response,
}

#[async_trait]
impl MediaStream for HttpMediaStream {
    fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.response
            .chunk()
            .await
            .map_err(|e| FetchError::Transfer(e.to_string()))
    }
}

/// Connection problems mean the candidate is unreachable, anything else is
/// the server misbehaving
fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Discovery(format!("connection error, could not load {}: {}", url, e))
    } else if e.is_timeout() {
        FetchError::Discovery(format!("timeout reading from {}", url))
    } else {
        FetchError::Protocol(format!("request to {} failed: {}", url, e))
    }
}
