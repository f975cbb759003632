//! Forwarding of unmatched `/api` requests to the legacy API.
//!
//! Requests are relayed once, with the service's own credentials and a `Via`
//! marker. A body over the size limit is refused with 413 before any upstream
//! contact. Any other failure becomes a 502 with a fixed body; nothing from the
//! transport leaks to the caller.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::error::ApiError;
use crate::state::AppState;

/// Marks every response that went through (or failed in) the proxy.
pub const VIA: &str = "HTTP/1.1 new-api";

pub const PROXY_FAILURE_MESSAGE: &str = "Failed proxying request to the old API";

/// Connection-scoped headers that are never relayed in either direction.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    // recomputed for the buffered body
    "content-length",
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("OLD_API_ENDPOINT has no usable host: {0}")]
    InvalidEndpoint(String),

    #[error("OLD_API_TOKEN cannot be sent as a header value")]
    InvalidToken,

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed")]
    Upstream(#[from] reqwest::Error),
}

/// Client side of the legacy API. Built once at startup and shared by all requests.
pub struct LegacyProxy {
    client: reqwest::Client,
    base_url: String,
    host: HeaderValue,
    authorization: HeaderValue,
}

impl LegacyProxy {
    pub fn new(settings: &Settings) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .no_gzip()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(settings.api.upstream_timeout_secs))
            .build()
            .map_err(ProxyError::Client)?;

        let host = netloc(&settings.old_api_endpoint)
            .and_then(|netloc| HeaderValue::from_str(&netloc).ok())
            .ok_or_else(|| ProxyError::InvalidEndpoint(settings.old_api_endpoint.clone()))?;
        let authorization = HeaderValue::from_str(&format!("Token {}", settings.old_api_token))
            .map_err(|_| ProxyError::InvalidToken)?;

        Ok(Self {
            client,
            base_url: settings.old_api_endpoint.clone(),
            host,
            authorization,
        })
    }

    /// Maps an inbound `/api/...` path onto the legacy base URL.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        let rest = path
            .strip_prefix("/api/")
            .or_else(|| path.strip_prefix("/api"))
            .unwrap_or(path);

        let mut url = self.base_url.clone();
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(rest);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Inbound headers minus connection-level ones, with the service's overrides.
    fn upstream_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut headers = relayable_headers(inbound);
        headers.insert(header::HOST, self.host.clone());
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(header::VIA, HeaderValue::from_static(VIA));
        headers
    }

    /// Send the request upstream once and relay the answer.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, ProxyError> {
        let url = self.upstream_url(uri.path(), uri.query());
        debug!(%method, upstream = %url, "Proxying request to the old API");

        let is_head = method == Method::HEAD;
        let upstream = self
            .client
            .request(method, url)
            .headers(self.upstream_headers(headers))
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut headers = relayable_headers(upstream.headers());
        // A HEAD answer has no body to measure, so its length is relayed as sent.
        if is_head {
            if let Some(length) = upstream.headers().get(header::CONTENT_LENGTH) {
                headers.insert(header::CONTENT_LENGTH, length.clone());
            }
        }
        let body = upstream.bytes().await?;

        headers.insert(header::VIA, HeaderValue::from_static(VIA));
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// `host[:port]` of a URL, as sent in the `Host` header.
fn netloc(endpoint: &str) -> Option<String> {
    let url = url::Url::parse(endpoint).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Copies every value of every header except connection-level ones, including
/// those the `Connection` header itself names.
fn relayable_headers(source: &HeaderMap) -> HeaderMap {
    let named_by_connection: Vec<String> = source
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    let mut headers = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if HOP_BY_HOP.contains(&name.as_str()) || named_by_connection.iter().any(|n| n == name.as_str()) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Lowest-priority handler for the `/api` namespace.
///
/// The body is buffered up to the configured request size limit before anything
/// is sent upstream.
pub async fn proxy_to_legacy_api(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let path = uri.path().to_string();

    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            debug!(%method, %path, "Request body over the size limit, not proxied");
            let err = ApiError::PayloadTooLarge("Request body is too large.".to_string());
            return ([(header::VIA, VIA)], err).into_response();
        }
        Err(rejection) => {
            warn!(%method, %path, error = %rejection.body_text(), "Could not read request body");
            return proxy_failure();
        }
    };

    match state.proxy.forward(method.clone(), &uri, &headers, body).await {
        Ok(response) => response,
        Err(err) => {
            error!(%method, %path, error = ?err, "{PROXY_FAILURE_MESSAGE}");
            proxy_failure()
        }
    }
}

fn proxy_failure() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [(header::VIA, VIA)],
        PROXY_FAILURE_MESSAGE,
    )
        .into_response()
}
