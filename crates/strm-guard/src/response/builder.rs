use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::http::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Response, StatusCode};
use std::convert::Infallible;

/// Builder for responses generated by strm-guard itself (redirects, gateway errors).
pub struct ResponseBuilder {
    status: StatusCode,
    body: Bytes,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn new(status_code: StatusCode) -> Self {
        ResponseBuilder {
            status: status_code,
            body: Bytes::new(),
            headers: Default::default(),
        }
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn build_full(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    /// Build with a boxed body whose error type matches the surrounding service.
    pub fn build_boxed<E>(self) -> Response<BoxBody<Bytes, E>> {
        self.build_full()
            .map(|body| body.map_err(|never: Infallible| match never {}).boxed())
    }
}
