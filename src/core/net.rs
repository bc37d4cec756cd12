// src/core/net.rs
// Blocking HTTP over reqwest. One client per run, shared by the image workers.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};

use crate::config::consts::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

/// Body bytes plus the raw `Content-Type` header, if any.
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

pub fn build_client(cookie: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(c) = cookie.map(str::trim).filter(|c| !c.is_empty()) {
        let value = HeaderValue::from_str(c)
            .map_err(|_| Error::InvalidInput(s!("cookie contains characters not allowed in a header")))?;
        headers.insert(COOKIE, value);
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// GET `url`; non-2xx is an error.
pub fn http_get(client: &Client, url: &str) -> Result<Fetched> {
    let resp = client.get(url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status { status: status.as_u16(), url: s!(url) });
    }
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = resp.bytes()?.to_vec();
    logd!("GET {url}: {} bytes", bytes.len());
    Ok(Fetched { bytes, content_type })
}

pub fn http_get_text(client: &Client, url: &str) -> Result<String> {
    let fetched = http_get(client, url)?;
    Ok(String::from_utf8_lossy(&fetched.bytes).into_owned())
}
