// API client module: a small blocking HTTP client for the ISE External
// RESTful Services (ERS) guest user endpoints.
//
// The submitters only see the `Transport` trait, so they can be driven by
// an in-memory fake in tests and by `ApiClient` in the binary.

use crate::config::SessionConfig;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

/// Bulk create endpoint; ISE answers 202 and processes the job async.
pub const BULK_SUBMIT_PATH: &str = "/ers/config/guestuser/bulk/submit";
/// Single guest user resource; ISE answers 201 on create.
pub const GUEST_USER_PATH: &str = "/ers/config/guestuser";

pub const GUEST_USER_XML_MEDIA_TYPE: &str = "application/vnd.com.cisco.ise.identity.guestuser.2.0+xml";
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Put,
    Post,
}

/// One outgoing ERS call. `content_type` is sent as both Content-Type and
/// Accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiRequest {
    pub fn bulk_submit(xml: String) -> Self {
        ApiRequest {
            method: Method::Put,
            path: BULK_SUBMIT_PATH,
            content_type: GUEST_USER_XML_MEDIA_TYPE,
            body: xml,
        }
    }

    pub fn create_guest_user(json: String) -> Self {
        ApiRequest {
            method: Method::Post,
            path: GUEST_USER_PATH,
            content_type: JSON_MEDIA_TYPE,
            body: json,
        }
    }
}

/// Status and raw body of an ERS response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a request and returns whatever the server answered. An `Err` means
/// no HTTP response was obtained (connection, TLS, timeout).
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport holding the session's host and credentials.
pub struct ApiClient {
    client: Client,
    config: SessionConfig,
}

impl ApiClient {
    /// Build a client for `config`. Certificate verification is only turned
    /// off when the operator asked for it.
    pub fn new(config: SessionConfig) -> Result<Self> {
        if config.insecure {
            warn!(host = %config.host, "TLS certificate verification is disabled");
        }
        let mut builder = Client::builder().danger_accept_invalid_certs(config.insecure);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(ApiClient { client, config })
    }

    /// Content-Type and Accept for a request.
    fn media_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_static(content_type);
        headers.insert(CONTENT_TYPE, value.clone());
        headers.insert(ACCEPT, value);
        headers
    }
}

impl Transport for ApiClient {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.config.url(request.path);
        debug!(method = ?request.method, %url, bytes = request.body.len(), "sending request");

        let builder = match request.method {
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
        };
        let res = builder
            .basic_auth(&self.config.username, Some(&self.config.password))
            .headers(Self::media_headers(request.content_type))
            .body(request.body.clone())
            .send()
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status().as_u16();
        let body = res.text().unwrap_or_else(|_| "".into());
        debug!(status, "received response");
        Ok(ApiResponse { status, body })
    }
}
