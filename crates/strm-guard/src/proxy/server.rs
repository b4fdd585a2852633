//! ProxyServer struct and main run loop.
//!
//! The server owns the live interception snapshot and the shared upstream
//! client. Every accepted connection gets a clone of the composed service:
//! `ErrorVideoLayer` wrapped around `UpstreamForwarder`.

use super::client::{create_http_client, HttpClient};
use super::forwarding::UpstreamForwarder;
use crate::config::Config;
use crate::intercept::{ErrorVideoLayer, ErrorVideoService, SharedSnapshot};
use crate::response::error_response;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::{ServiceBuilder, ServiceExt};
use tracing::{error, info};

/// The composed per-request service.
pub type ProxyService = ErrorVideoService<UpstreamForwarder>;

/// The main proxy server struct.
pub struct ProxyServer {
    config: Config,
    snapshot: SharedSnapshot,
    http_client: HttpClient,
}

impl ProxyServer {
    /// Create a new ProxyServer from configuration.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let snapshot = SharedSnapshot::from_config(&config.error_handler)?;
        let http_client = create_http_client(&config.connection_pool)?;

        Ok(Self {
            config,
            snapshot,
            http_client,
        })
    }

    /// Handle used to swap the error handler settings while running.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    pub fn service(&self) -> ProxyService {
        ServiceBuilder::new()
            .layer(ErrorVideoLayer::new(self.snapshot.clone()))
            .service(UpstreamForwarder::new(
                self.http_client.clone(),
                self.config.upstream.base_url(),
            ))
    }

    /// Bind the configured address and serve until the listener fails.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener =
            TcpListener::bind((self.config.listen.host.as_str(), self.config.listen.port)).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        let addr: SocketAddr = listener.local_addr()?;
        let current = self.snapshot.load();

        info!("Listening on http://{}", addr);
        info!("Proxying to {}", self.config.upstream.base_url());
        info!(
            "Intercepting {:?} with {} error rules, videos under {}",
            current.prefixes.as_slice(),
            current.classifier.len(),
            current.video_path
        );

        let service = self.service();

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let service = service.clone();

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let hyper_service = service_fn(move |req| {
                    let service = service.clone();
                    async move { Ok::<_, Infallible>(handle_request(service, req).await) }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, hyper_service)
                    .await
                {
                    error!(
                        "Error serving HTTP connection from {}: {}",
                        remote_addr, err
                    );
                }
            });
        }
    }
}

/// Run one request through the middleware stack. A downstream failure ends
/// here as a 502, the same way an unwrapped proxy would report it.
async fn handle_request(
    service: ProxyService,
    req: Request<Incoming>,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    let method = req.method().clone();
    let uri = req.uri().clone();

    match service.oneshot(req).await {
        Ok(response) => response,
        Err(err) => {
            error!("Upstream request {} {} failed: {}", method, uri, err);
            error_response(StatusCode::BAD_GATEWAY, "Bad Gateway")
        }
    }
}
