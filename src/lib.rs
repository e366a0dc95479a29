//! # dnscheck
//!
//! Ask every resolver in a list what it answers for one domain.
//!
//! `dnscheck` sends one A query per configured DNS resolver, all at once,
//! each bounded by its own timeout, and reports every resolver's answer,
//! whether addresses, `"no results"` or an error description. A slow or dead
//! resolver only ever costs its own timeout and never hides the others.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dnscheck::check::Checker;
//! use dnscheck::dns::ResolverEndpoint;
//!
//! #[tokio::main]
//! async fn main() {
//!     let endpoints = vec![
//!         ResolverEndpoint::new("Google", "8.8.8.8"),
//!         ResolverEndpoint::new("Cloudflare", "1.1.1.1"),
//!     ];
//!     let result = Checker::default().check_all("example.com", &endpoints).await;
//!     for outcome in &result.outcomes {
//!         println!("{}: {}", outcome.server_name, outcome.result_text);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and context helpers
//! - [`dns`] - Single-resolver A lookups
//! - [`check`] - Concurrent fan-out over a resolver list
//! - [`config`] - Settings and resolver list loading
//! - [`server`] - HTTP/JSON front end

pub mod base;
pub mod check;
pub mod config;
pub mod dns;
pub mod server;
