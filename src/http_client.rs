use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client. The timeout of the first caller wins.
pub fn http_client_with_timeout(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .context("failed to build http client")
    })
}
