//! Resolver client.
//!
//! Queries one DNS server for the A records of one domain and reports the
//! result as text. The [`Lookup`] trait is the seam between the fan-out in
//! [`crate::check`] and the wire: [`UdpLookup`] talks to real servers, tests
//! plug in their own implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use dnscheck::dns::{resolve, UdpLookup, DEFAULT_QUERY_TIMEOUT};
//!
//! let text = resolve(&UdpLookup::new(), "example.com", "1.1.1.1", DEFAULT_QUERY_TIMEOUT).await;
//! println!("1.1.1.1 says: {}", text);
//! ```

mod resolve;
mod udp;

pub use resolve::{
    render, resolve, Answering, Lookup, ResolverEndpoint, DEFAULT_QUERY_TIMEOUT, NO_RESULTS,
};
pub use udp::{UdpLookup, DNS_PORT};
