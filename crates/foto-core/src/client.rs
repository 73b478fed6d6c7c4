//! HTTP listing retrieval.
//!
//! Uses the curl crate (libcurl) to GET a navigation path relative to the
//! configured server URL and parse the body as JSON.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::listing::Listing;

/// Failure of a single listing retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL for path {path:?}: {source}")]
    InvalidUrl {
        path: String,
        source: url::ParseError,
    },
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
    #[error("response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Capability to retrieve the listing at a path.
///
/// Calls block; async callers run them on the blocking pool.
pub trait ListingClient: Send + Sync + 'static {
    fn get(&self, path: &str) -> Result<Listing, FetchError>;
}

/// Resolves `path` against `base` the way a browser resolves a link.
pub fn join_url(base: &url::Url, path: &str) -> Result<url::Url, FetchError> {
    base.join(path).map_err(|source| FetchError::InvalidUrl {
        path: path.to_string(),
        source,
    })
}

/// curl-backed [`ListingClient`].
#[derive(Debug, Clone)]
pub struct HttpListingClient {
    base: url::Url,
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpListingClient {
    pub fn new(base: url::Url) -> Self {
        let defaults = ClientConfig::default();
        Self {
            base,
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            timeout: Duration::from_secs(defaults.request_timeout_secs),
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self, FetchError> {
        let base = url::Url::parse(&cfg.server_url).map_err(|source| FetchError::InvalidUrl {
            path: cfg.server_url.clone(),
            source,
        })?;
        Ok(Self {
            base,
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
        })
    }

    pub fn base(&self) -> &url::Url {
        &self.base
    }

    fn perform(&self, url: &url::Url) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl ListingClient for HttpListingClient {
    fn get(&self, path: &str) -> Result<Listing, FetchError> {
        let url = join_url(&self.base, path)?;
        tracing::debug!(url = %url, "GET listing");
        let (status, body) = self.perform(&url)?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        Ok(Listing::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> url::Url {
        url::Url::parse("http://127.0.0.1:8000").unwrap()
    }

    #[test]
    fn join_absolute_path() {
        let u = join_url(&base(), "/photos/2020/").unwrap();
        assert_eq!(u.as_str(), "http://127.0.0.1:8000/photos/2020/");
    }

    #[test]
    fn join_replaces_base_path() {
        let b = url::Url::parse("http://example.com/app/index.html").unwrap();
        assert_eq!(
            join_url(&b, "/photos/").unwrap().as_str(),
            "http://example.com/photos/"
        );
        assert_eq!(
            join_url(&b, "photos/").unwrap().as_str(),
            "http://example.com/app/photos/"
        );
    }

    #[test]
    fn join_encodes_spaces() {
        let u = join_url(&base(), "/photos/summer trip/").unwrap();
        assert_eq!(u.path(), "/photos/summer%20trip/");
    }

    #[test]
    fn from_config_rejects_bad_server_url() {
        let cfg = ClientConfig {
            server_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpListingClient::from_config(&cfg),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn http_error_display() {
        let e = FetchError::Http {
            url: "http://h/photos/".to_string(),
            status: 404,
        };
        assert_eq!(e.to_string(), "GET http://h/photos/ returned HTTP 404");
    }
}
