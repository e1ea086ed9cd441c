use crate::error::TailError;
use crate::query::SearchRequest;
use crate::schemas::SearchResponse;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Anything that can answer a search request.
pub trait SearchBackend {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse, TailError>;
}

/// Elasticsearch `_search` endpoint over blocking HTTP.
pub struct HttpSearchClient {
    client: Client,
    url: String,
}

impl HttpSearchClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TailError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TailError::transport(url.clone(), err))?;
        Ok(Self { client, url })
    }

    fn fetch(&self, body: Vec<u8>) -> Result<(reqwest::StatusCode, Vec<u8>), TailError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| TailError::transport(self.url.clone(), err))?;

        let status = response.status();
        // Reading the body consumes the response and releases the connection
        let bytes = response
            .bytes()
            .map_err(|err| TailError::transport(self.url.clone(), err))?;

        Ok((status, bytes.to_vec()))
    }
}

impl SearchBackend for HttpSearchClient {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse, TailError> {
        let body = request.to_json()?;
        tracing::debug!("Query URI: {}", self.url);
        tracing::debug!("Elastic Search Request:\n{}", String::from_utf8_lossy(&body));

        let (status, bytes) = self.fetch(body)?;
        tracing::debug!(
            "Elastic Search Response ({}):\n{}",
            status,
            String::from_utf8_lossy(&bytes)
        );

        let response = SearchResponse::from_slice(&bytes);
        if !status.is_success() {
            // Prefer the status and reason the backend put in the body
            if let Ok(parsed) = &response {
                parsed.check_status()?;
            }
            return Err(TailError::BackendStatus {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unexpected HTTP status")
                    .to_string(),
            });
        }

        let response = response?;
        response.check_status()?;
        Ok(response)
    }
}
