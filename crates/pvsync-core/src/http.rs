//! Blocking HTTP GET over libcurl.
//!
//! The fetcher is async but libcurl's easy interface blocks, so callers run
//! [`HttpGet::get`] inside `spawn_blocking`. The trait is the seam tests use
//! to script responses without a network.

use std::time::Duration;

use crate::retry::FetchError;

/// One GET returning the whole body, or an error for transport failures and non-2xx statuses.
pub trait HttpGet: Send + Sync + 'static {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Client settings shared by every request.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Overall transfer limit; `None` leaves libcurl's default (no limit).
    pub timeout: Option<Duration>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(30),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlClient {
    options: CurlOptions,
}

impl CurlClient {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }
}

impl HttpGet for CurlClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.options.user_agent)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        if let Some(t) = self.options.timeout {
            easy.timeout(t)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}
