//! Runtime configuration.
//!
//! [`CheckConfig`] holds the few knobs the service has; the resolver list
//! itself comes from an [`EndpointSource`], re-read per request.

mod endpoints;

pub use endpoints::{
    parse_endpoint_list, CsvFile, EndpointSource, Loading, ParseError, ParseErrorKind,
    StaticEndpoints,
};

use crate::dns::DEFAULT_QUERY_TIMEOUT;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

/// Default listen address of the HTTP service.
pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Default resolver list location, relative to the working directory.
pub const DEFAULT_LIST_PATH: &str = "list.csv";

/// Service settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckConfig {
    pub listen: SocketAddr,
    pub list_path: PathBuf,
    /// Per-resolver wait. There is no batch-wide limit.
    pub query_timeout: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            list_path: PathBuf::from(DEFAULT_LIST_PATH),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl CheckConfig {
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_list_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.list_path = path.into();
        self
    }

    /// Set the per-query timeout. Zero is replaced by the default.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = if timeout.is_zero() {
            DEFAULT_QUERY_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// The configured resolver list file as an endpoint source.
    pub fn endpoint_source(&self) -> CsvFile {
        CsvFile::new(self.list_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.listen, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.list_path, PathBuf::from("list.csv"));
        assert_eq!(config.query_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_setters() {
        let config = CheckConfig::default()
            .with_listen("127.0.0.1:9000".parse().unwrap())
            .with_list_path("/etc/dnscheck/list.csv")
            .with_query_timeout(Duration::from_millis(1500));

        assert_eq!(config.listen.port(), 9000);
        assert_eq!(
            config.endpoint_source().path(),
            std::path::Path::new("/etc/dnscheck/list.csv")
        );
        assert_eq!(config.query_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_zero_timeout_keeps_default() {
        let config = CheckConfig::default().with_query_timeout(Duration::ZERO);
        assert_eq!(config.query_timeout, DEFAULT_QUERY_TIMEOUT);
    }
}
