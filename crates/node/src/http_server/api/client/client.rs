use reqwest::{header::HeaderMap, header::HeaderValue, Client, RequestBuilder};
use url::Url;

use common::prelude::PresentedKeys;

use super::error::ApiError;
use super::ApiRequest;
use crate::http_server::api::v0::ErrorBody;
use crate::http_server::{MASTER_KEY_HEADER, READER_KEY_HEADER, WRITER_KEY_HEADER};

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&mut self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            let status = response.status();
            let text = response.text().await?;
            // surface the node's own message when there is one
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error_message)
                .unwrap_or(text);
            Err(ApiError::HttpStatus(status, message))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Attach presented pool keys as request headers
pub fn with_keys(mut builder: RequestBuilder, keys: &PresentedKeys) -> RequestBuilder {
    for (header, key) in [
        (MASTER_KEY_HEADER, &keys.master),
        (WRITER_KEY_HEADER, &keys.writer),
        (READER_KEY_HEADER, &keys.reader),
    ] {
        if let Some(key) = key {
            builder = builder.header(header, key);
        }
    }
    builder
}
