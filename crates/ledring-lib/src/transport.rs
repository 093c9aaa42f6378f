//! HTTP exchange — trait + blocking `reqwest` backend.
//!
//! The remote client only needs "send one request, get status, headers and
//! body back". Retry, pacing and JSON handling live in [`crate::client`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP methods used against the light service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request. `path` is relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// One response, fully read.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// ── Trait ──

/// Performs a single HTTP exchange. Implementations never retry.
pub trait HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

// ── reqwest backend ──

/// Blocking transport over `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport rooted at `base_url`. A trailing `/` is added if missing.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self.client.request(request.method.into(), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| ApiError::Transport(format!("{} {url}: {e}", request.method)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|e| ApiError::Transport(format!("reading body: {e}")))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ── Mock transport for testing ──

/// Scripted transport for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Pops one scripted response per request and records every request.
    ///
    /// When the script is exhausted, answers `200` with an empty body.
    #[derive(Default)]
    pub struct MockTransport {
        pub responses: RefCell<VecDeque<HttpResponse>>,
        pub requests: RefCell<Vec<HttpRequest>>,
        /// If true, `execute` fails with a transport error.
        pub fail_transport: Cell<bool>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response.
        pub fn push(&self, response: HttpResponse) {
            self.responses.borrow_mut().push_back(response);
        }

        /// Queue a `200` with a JSON body.
        pub fn push_json(&self, body: &serde_json::Value) {
            self.push(HttpResponse::new(200, body.to_string()));
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl HttpTransport for MockTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail_transport.get() {
                return Err(ApiError::Transport(
                    "mock: transport failure injected".into(),
                ));
            }
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| HttpResponse::new(200, Vec::new())))
        }
    }
}
