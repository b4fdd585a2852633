//! Request forwarding to the upstream STRM backend.
//!
//! The forwarder is the "next handler" the error-video middleware wraps. It
//! never buffers: the request body is streamed up and the response body is
//! handed back as hyper's `Incoming`.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use http_body_util::combinators::BoxBody;
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::HOST;
use hyper::{Request, Response};
use tower::Service;
use tracing::debug;

use super::client::HttpClient;
use crate::error::ProxyError;

/// `tower::Service` that sends each request to `{base_url}{path_and_query}`.
#[derive(Clone)]
pub struct UpstreamForwarder {
    client: HttpClient,
    base_url: Arc<str>,
}

impl UpstreamForwarder {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }
}

impl Service<Request<Incoming>> for UpstreamForwarder {
    type Response = Response<Incoming>;
    type Error = ProxyError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Incoming>) -> Self::Future {
        let upstream_req = build_upstream_request(&self.base_url, req);
        let client = self.client.clone();

        Box::pin(async move {
            let upstream_req = upstream_req?;
            Ok(client.request(upstream_req).await?)
        })
    }
}

/// Rewrite an inbound request for the upstream: same method, path, query,
/// headers (minus `host`) and a streaming body.
pub fn build_upstream_request<B>(
    base_url: &str,
    req: Request<B>,
) -> Result<Request<BoxBody<Bytes, hyper::Error>>, ProxyError>
where
    B: Body<Data = Bytes, Error = hyper::Error> + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let upstream_path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let full_uri = format!("{base_url}{upstream_path}");

    debug!("Forwarding {} to: {}", parts.method, full_uri);

    let mut builder = Request::builder().method(parts.method).uri(&full_uri);
    if let Some(headers) = builder.headers_mut() {
        for (key, value) in parts.headers.iter() {
            if key != HOST {
                headers.append(key, value.clone());
            }
        }
    }

    builder
        .body(BoxBody::new(body))
        .map_err(|source| ProxyError::InvalidRequest {
            uri: full_uri,
            source,
        })
}
