//! Request handling for the check endpoint.

use crate::base::checkerror::CheckError;
use crate::check::{Checker, ResolutionResult};
use crate::config::EndpointSource;
use bytes::Bytes;
use http::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    HeaderValue, Response, StatusCode, Uri,
};
use http_body_util::Full;
use serde::Serialize;
use std::{fmt, sync::Arc};

/// Name of the query parameter carrying the domain to check.
pub const DOMAIN_PARAM: &str = "domain";

/// The check endpoint: resolver list source plus the fan-out checker.
///
/// Cheap to clone; one clone is handed to every connection.
#[derive(Clone)]
pub struct DnsCheckService {
    source: Arc<dyn EndpointSource>,
    checker: Checker,
}

impl DnsCheckService {
    pub fn new(source: Arc<dyn EndpointSource>, checker: Checker) -> Self {
        Self { source, checker }
    }

    /// Check `domain` against the current resolver list.
    ///
    /// A missing or empty domain is rejected before the list is loaded; a
    /// list that fails to load rejects the whole request.
    pub async fn run(&self, domain: Option<&str>) -> Result<ResolutionResult, CheckError> {
        let domain = match domain {
            Some(domain) if !domain.is_empty() => domain,
            _ => return Err(CheckError::MissingParameter(DOMAIN_PARAM)),
        };

        let endpoints = self.source.endpoints().await.map_err(|e| {
            tracing::warn!(error = %e, "resolver list unavailable");
            e
        })?;

        Ok(self.checker.check_all(domain, &endpoints).await)
    }

    /// Answer one HTTP request. Only the `domain` query parameter is looked
    /// at; method and path are ignored.
    pub async fn handle(&self, uri: &Uri) -> Response<Full<Bytes>> {
        let domain = domain_param(uri);
        tracing::debug!(uri = %uri, domain = ?domain, "check request");

        match self.run(domain.as_deref()).await {
            Ok(result) => json_response(StatusCode::OK, &result),
            Err(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                json_response(status, &e.to_body())
            }
        }
    }
}

impl fmt::Debug for DnsCheckService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsCheckService")
            .field("checker", &self.checker)
            .finish_non_exhaustive()
    }
}

/// First `domain` value of the query string, URL-decoded.
pub fn domain_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == DOMAIN_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            (status, Bytes::from(bytes))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(b"{\"code\":500,\"message\":\"internal error\"}\n"),
            )
        }
    };

    let mut response = Response::new(Full::new(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_param_decoded() {
        let uri: Uri = "/check?foo=1&domain=ex%61mple.com&domain=other.org"
            .parse()
            .unwrap();
        assert_eq!(domain_param(&uri).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_domain_param_absent() {
        let uri: Uri = "/?name=example.com".parse().unwrap();
        assert_eq!(domain_param(&uri), None);

        let uri: Uri = "/".parse().unwrap();
        assert_eq!(domain_param(&uri), None);
    }

    #[test]
    fn test_domain_param_empty() {
        let uri: Uri = "/?domain=".parse().unwrap();
        assert_eq!(domain_param(&uri).as_deref(), Some(""));
    }

    #[test]
    fn test_json_response_headers() {
        let response = json_response(StatusCode::BAD_REQUEST, &serde_json::json!({"code": 400}));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
