//! Request inspection.
//!
//! # Responsibilities
//! - Build the per-request descriptor the guard consumes
//! - Resolve the protocol from the listener's transport marker
//! - Honour `X-Forwarded-Proto` / `X-Forwarded-Host` when the proxy is trusted
//! - Generate a request ID (UUID v4) for every request

use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Transport a request arrived on. Inserted as a request extension by the
/// server, one value per listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Encrypted,
}

impl Transport {
    pub fn protocol(self) -> &'static str {
        match self {
            Transport::Plain => "http",
            Transport::Encrypted => "https",
        }
    }
}

/// What the guard sees of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// `"https"` or `"http"`, or the forwarded value when the proxy is trusted.
    pub protocol: String,
    /// Host as sent by the client, possibly with a port.
    pub hostname: String,
    /// Path and query, verbatim.
    pub url: String,
}

impl RequestDescriptor {
    pub fn from_request<B>(req: &Request<B>, trust_proxy: bool) -> Self {
        let headers = req.headers();

        let forwarded = |name: &str| trust_proxy.then(|| last_forwarded(headers, name)).flatten();

        let protocol = forwarded(X_FORWARDED_PROTO).unwrap_or_else(|| {
            let encrypted = req.extensions().get::<Transport>() == Some(&Transport::Encrypted)
                || req.uri().scheme_str() == Some("https");
            let transport = if encrypted { Transport::Encrypted } else { Transport::Plain };
            transport.protocol().to_string()
        });

        let hostname = forwarded(X_FORWARDED_HOST)
            .or_else(|| {
                headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()))
            .unwrap_or_default();

        let url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self {
            protocol,
            hostname,
            url,
        }
    }
}

/// Last element of a comma-separated forwarding header, trimmed.
fn last_forwarded(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?;
    let last = value.rsplit(',').next()?.trim();
    (!last.is_empty()).then(|| last.to_string())
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn get(uri: &str) -> axum::http::request::Builder {
        Request::builder().uri(uri)
    }

    #[test]
    fn plain_request_descriptor() {
        let req = get("/a/url?qp=hi")
            .header("Host", "localhost:3080")
            .body(Body::empty())
            .unwrap();
        let desc = RequestDescriptor::from_request(&req, false);
        assert_eq!(desc.protocol, "http");
        assert_eq!(desc.hostname, "localhost:3080");
        assert_eq!(desc.url, "/a/url?qp=hi");
    }

    #[test]
    fn encrypted_transport_marker() {
        let mut req = get("/").header("Host", "localhost").body(Body::empty()).unwrap();
        req.extensions_mut().insert(Transport::Encrypted);
        assert_eq!(RequestDescriptor::from_request(&req, false).protocol, "https");

        req.extensions_mut().insert(Transport::Plain);
        assert_eq!(RequestDescriptor::from_request(&req, false).protocol, "http");
    }

    #[test]
    fn absolute_uri_supplies_scheme_and_authority() {
        let req = get("https://example.com:8443/x").body(Body::empty()).unwrap();
        let desc = RequestDescriptor::from_request(&req, false);
        assert_eq!(desc.protocol, "https");
        assert_eq!(desc.hostname, "example.com:8443");
        assert_eq!(desc.url, "/x");
    }

    #[test]
    fn forwarded_headers_ignored_unless_trusted() {
        let req = get("/")
            .header("Host", "localhost:3081")
            .header("X-Forwarded-Proto", "https")
            .header("X-Forwarded-Host", "localhost:3443")
            .body(Body::empty())
            .unwrap();

        let untrusted = RequestDescriptor::from_request(&req, false);
        assert_eq!(untrusted.protocol, "http");
        assert_eq!(untrusted.hostname, "localhost:3081");

        let trusted = RequestDescriptor::from_request(&req, true);
        assert_eq!(trusted.protocol, "https");
        assert_eq!(trusted.hostname, "localhost:3443");
    }

    #[test]
    fn forwarded_list_uses_last_hop() {
        let req = get("/")
            .header("X-Forwarded-Proto", "https, http")
            .header("X-Forwarded-Host", "a.example , b.example")
            .body(Body::empty())
            .unwrap();
        let desc = RequestDescriptor::from_request(&req, true);
        assert_eq!(desc.protocol, "http");
        assert_eq!(desc.hostname, "b.example");
    }

    #[test]
    fn missing_host_is_empty() {
        let req = get("/").body(Body::empty()).unwrap();
        assert_eq!(RequestDescriptor::from_request(&req, false).hostname, "");
    }

    #[test]
    fn request_ids_are_unique() {
        let req = get("/").body(Body::empty()).unwrap();
        let mut make = MakeRequestUuid;
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
