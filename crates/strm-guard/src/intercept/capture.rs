//! Full-body capture of a downstream response and its verbatim replay.
//!
//! Capturing buffers the whole body in memory before anything reaches the
//! client, so intercepted paths lose streaming and pay the full body size per
//! in-flight request.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::http::response::Parts;
use hyper::{HeaderMap, Response, StatusCode};
use std::convert::Infallible;

/// A downstream response held back from the client.
#[derive(Debug)]
pub struct CapturedResponse {
    parts: Parts,
    body: Bytes,
}

impl CapturedResponse {
    /// Drain `response` completely. A body read failure is the downstream's
    /// failure and is returned unchanged.
    pub async fn collect<B>(response: Response<B>) -> Result<Self, B::Error>
    where
        B: Body,
    {
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Self { parts, body })
    }

    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Rebuild the original response: same status, version, headers (in
    /// order), extensions, and the full body as a single frame.
    pub fn replay<E>(self) -> Response<BoxBody<Bytes, E>> {
        let body = Full::new(self.body)
            .map_err(|never: Infallible| match never {})
            .boxed();
        Response::from_parts(self.parts, body)
    }
}
