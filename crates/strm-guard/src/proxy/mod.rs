//! Proxy server module.
//!
//! Hosts the error-video middleware in front of a single STRM upstream.
//!
//! # Module Structure
//!
//! - `server` - ProxyServer struct and main run loop
//! - `forwarding` - the upstream forwarder service
//! - `client` - HTTP client creation and configuration

mod client;
mod forwarding;
mod server;

pub use client::{create_http_client, HttpClient};
pub use forwarding::{build_upstream_request, UpstreamForwarder};
pub use server::{ProxyServer, ProxyService};
