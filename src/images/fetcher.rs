use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Duration;

/// Why an image could not be produced for a key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid image key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("request for {key} failed: {reason}")]
    Network { key: String, reason: String },
    #[error("request for {key} returned HTTP {status}")]
    Status { key: String, status: u16 },
    #[error("could not decode image from {key}: {reason}")]
    Decode { key: String, reason: String },
}

/// Source of raw image bytes for a cache key
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>>;
}

/// Downloads images over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> color_eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

/// Accept only absolute http/https URLs as keys
pub fn parse_key(key: &str) -> Result<reqwest::Url, FetchError> {
    let url = reqwest::Url::parse(key).map_err(|e| FetchError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidKey {
            key: key.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
        let url = match parse_key(key) {
            Ok(url) => url,
            Err(e) => return futures::future::ready(Err(e)).boxed(),
        };
        let client = self.client.clone();
        let key = key.to_string();

        async move {
            log::debug!("Downloading image {}", key);
            let network = |e: reqwest::Error| FetchError::Network {
                key: key.clone(),
                reason: e.to_string(),
            };

            let response = client.get(url).send().await.map_err(network)?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    key: key.clone(),
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await.map_err(network)?;
            log::debug!("Downloaded {} bytes for {}", bytes.len(), key);
            Ok(bytes.to_vec())
        }
        .boxed()
    }
}
