//! strm-guard: replaces classified STRM endpoint failures with redirects to
//! pre-recorded error videos.
//!
//! The middleware itself ([`intercept::ErrorVideoLayer`]) is a plain `tower`
//! layer and can wrap any `Service<Request<_>>`; [`proxy::ProxyServer`] hosts
//! it in front of a single HTTP upstream.

pub mod config;
pub mod error;
pub mod intercept;
pub mod proxy;
pub mod reload;
pub mod response;

pub use config::Config;
pub use error::{ConfigError, ProxyError};
pub use intercept::{ErrorVideoLayer, ErrorVideoService, SharedSnapshot};
pub use proxy::ProxyServer;
