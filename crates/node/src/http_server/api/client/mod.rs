mod client;
mod error;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

pub use client::{with_keys, ApiClient};
pub use error::ApiError;

/// A call against the node API. Implemented next to the handler it targets.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// `base_url` with `segments` appended, each percent-encoded as one path segment
pub fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_segments() {
        let base = Url::parse("http://localhost:5084/").unwrap();
        let url = endpoint(&base, &["api", "v0", "pool", "my tag/x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5084/api/v0/pool/my%20tag%2Fx");
    }
}
