//! Helpers for responses strm-guard produces on its own behalf.

mod builder;

pub use builder::ResponseBuilder;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::header::CONTENT_TYPE;
use hyper::http::HeaderValue;
use hyper::{Response, StatusCode};

/// JSON error body in the shape `{"error": "<message>"}`.
pub fn error_response<E>(status: StatusCode, message: &str) -> Response<BoxBody<Bytes, E>> {
    ResponseBuilder::new(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(format!(r#"{{"error": "{message}"}}"#))
        .build_boxed()
}
