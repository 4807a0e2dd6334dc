use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::NetworkError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of remote content: the feed document and episode enclosures.
pub trait Fetcher {
    /// Issue a GET and return the body as a stream. Non-2xx is an error.
    fn get(&self, url: &str) -> Result<Box<dyn Read>, NetworkError>;

    /// Issue a GET and read the whole body into memory.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        let mut body = Vec::new();
        self.get(url)?
            .read_to_end(&mut body)
            .map_err(|source| NetworkError::Body {
                url: url.to_string(),
                source,
            })?;
        Ok(body)
    }
}

/// Blocking HTTP(S) fetcher. Owns a single client for the whole run; the
/// connection pool is released when the fetcher is dropped.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` bounds a whole request including the body; `None` lets
    /// long enclosure transfers run to completion.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, NetworkError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| NetworkError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!("{url} answered {status}");
        Ok(Box::new(response))
    }
}
