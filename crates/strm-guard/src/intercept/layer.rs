//! `tower` middleware that swaps classified STRM 500s for error-video redirects.

use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::combinators::BoxBody;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use tower::{BoxError, Layer, Service};
use tracing::{debug, info, warn};

use super::capture::CapturedResponse;
use super::redirect::{redirect_response, video_location};
use super::snapshot::{InterceptSnapshot, SharedSnapshot};

/// Wraps a downstream service with error-video interception.
#[derive(Debug, Clone)]
pub struct ErrorVideoLayer {
    snapshot: SharedSnapshot,
}

impl ErrorVideoLayer {
    pub fn new(snapshot: SharedSnapshot) -> Self {
        Self { snapshot }
    }
}

impl<S> Layer<S> for ErrorVideoLayer {
    type Service = ErrorVideoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorVideoService {
            inner,
            snapshot: self.snapshot.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorVideoService<S> {
    inner: S,
    snapshot: SharedSnapshot,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ErrorVideoService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
    ResBody: Body<Data = Bytes> + Send + Sync + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<BoxBody<Bytes, ResBody::Error>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // One snapshot for the whole request, even if a reload lands mid-flight
        let snapshot = self.snapshot.load();

        if !snapshot.prefixes.should_capture(req.uri().path()) {
            let downstream = self.inner.call(req);
            return Box::pin(async move {
                let response = downstream.await.map_err(Into::into)?;
                Ok(response.map(BoxBody::new))
            });
        }

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let downstream = self.inner.call(req);

        Box::pin(async move {
            let response = downstream.await.map_err(Into::into)?;
            let captured = CapturedResponse::collect(response)
                .await
                .map_err(Into::into)?;
            Ok(respond(&snapshot, &method, &path, captured))
        })
    }
}

/// Decide between redirect and replay for a fully captured response.
fn respond<E>(
    snapshot: &InterceptSnapshot,
    method: &Method,
    path: &str,
    captured: CapturedResponse,
) -> Response<BoxBody<Bytes, E>> {
    let status = captured.status();
    if status != StatusCode::INTERNAL_SERVER_ERROR {
        debug!(path, status = status.as_u16(), "Replaying captured response");
        return captured.replay();
    }

    info!(
        path,
        error_body = %String::from_utf8_lossy(captured.body()),
        "Intercepted 500 error from STRM endpoint"
    );

    let Some(classification) = snapshot.classifier.classify(status, captured.body()) else {
        debug!(path, "No error video matched, replaying original 500");
        return captured.replay();
    };

    let location = video_location(&snapshot.video_path, classification.video);
    match redirect_response(method, &location) {
        Ok(response) => {
            info!(
                path,
                rule = %classification.rule,
                video = classification.video,
                url = %location,
                "Redirecting to error video"
            );
            response
        }
        Err(e) => {
            warn!(
                path,
                url = %location,
                "Error video location is not a valid header value ({}), replaying original 500",
                e
            );
            captured.replay()
        }
    }
}
