//! HTTP server setup.
//!
//! # Responsibilities
//! - Install the HTTPS guard around the application routes
//! - Wire up middleware (timeout, tracing, request ID)
//! - Serve the plaintext listener and the optional TLS listener
//! - Mark each listener's requests with their [`Transport`]

use std::net::SocketAddr;
use std::future::IntoFuture;
use std::path::Path;
use std::time::Duration;

use axum::{body::Body, extract::Request, Extension, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServerConfig, TlsConfig};
use crate::enforcement::{HttpsAlways, RuntimeEnvironment};
use crate::error::{Error, Result};
use crate::http::request::{MakeRequestUuid, Transport, X_REQUEST_ID};
use crate::lifecycle::shutdown::signalled;
use crate::net::tls::load_tls_config;

/// Grace period for in-flight TLS connections on shutdown.
const TLS_DRAIN: Duration = Duration::from_secs(10);

/// HTTP server with HTTPS enforcement in front of the application routes.
pub struct HttpServer {
    app: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Build the server. `environment` is consulted here, once.
    pub fn new(config: ServerConfig, environment: &RuntimeEnvironment, routes: Router) -> Self {
        let app = Self::build_router(&config, environment, routes);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, environment: &RuntimeEnvironment, routes: Router) -> Router {
        let guarded = HttpsAlways::new(config.enforcement.clone())
            .trust_proxy(config.trust_proxy)
            .register(routes, environment);

        guarded
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let request_id = req
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The full router as served on a listener of the given transport.
    pub fn router(&self, transport: Transport) -> Router {
        self.app.clone().layer(Extension(transport))
    }

    /// Serve until `shutdown` fires. The TLS listener, when configured, is
    /// bound from config before anything is served, so a taken TLS port
    /// fails here instead of leaving redirects pointing at nothing.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<()> {
        let tls_listener = match &self.config.tls {
            Some(tls) => {
                let addr: SocketAddr = tls
                    .bind_address
                    .parse()
                    .map_err(|_| Error::BindAddress(tls.bind_address.clone()))?;
                Some(TcpListener::bind(addr).await.map_err(Error::Tls)?)
            }
            None => None,
        };
        self.serve(listener, tls_listener, shutdown).await
    }

    /// Serve on already-bound listeners. `tls_listener` requires `[tls]`
    /// in the config for its certificate and key.
    ///
    /// Returns as soon as either listener fails; on shutdown both drain.
    pub async fn serve(
        self,
        listener: TcpListener,
        tls_listener: Option<TcpListener>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        let tls_task = match (&self.config.tls, tls_listener) {
            (Some(tls), Some(tls_listener)) => {
                Some(self.spawn_tls(tls, tls_listener, shutdown.resubscribe()).await?)
            }
            (None, Some(_)) => return Err(Error::TlsNotConfigured),
            (_, None) => None,
        };

        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Plaintext listener started");

        let plain = axum::serve(listener, self.router(Transport::Plain))
            .with_graceful_shutdown(signalled(shutdown))
            .into_future();
        tokio::pin!(plain);

        match tls_task {
            None => plain.await?,
            Some(mut task) => {
                tokio::select! {
                    result = &mut plain => {
                        result?;
                        tls_outcome(task.await)?;
                    }
                    joined = &mut task => {
                        if let Err(e) = tls_outcome(joined) {
                            tracing::error!(error = %e, "TLS listener failed");
                            return Err(e);
                        }
                        plain.await?;
                    }
                }
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    async fn spawn_tls(
        &self,
        tls: &TlsConfig,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<std::io::Result<()>>> {
        let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
            .await
            .map_err(Error::Tls)?;
        let addr = listener.local_addr()?;
        let listener = listener.into_std()?;

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            signalled(shutdown).await;
            drain.graceful_shutdown(Some(TLS_DRAIN));
        });

        tracing::info!(address = %addr, "TLS listener started");
        let app = self.router(Transport::Encrypted);
        Ok(tokio::spawn(
            axum_server::from_tcp_rustls(listener, rustls)
                .handle(handle)
                .serve(app.into_make_service()),
        ))
    }
}

fn tls_outcome(joined: std::result::Result<std::io::Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result.map_err(Error::Tls),
        Err(e) => Err(Error::Tls(std::io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    fn server(config: ServerConfig, env: &str) -> HttpServer {
        let routes = Router::new().route("/a/url", get(|| async { "ok" }));
        HttpServer::new(config, &RuntimeEnvironment::new(env), routes)
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Host", "localhost:3080")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn plain_listener_redirects() {
        let res = server(ServerConfig::default(), "production")
            .router(Transport::Plain)
            .oneshot(request("/a/url?qp=hi"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://localhost/a/url?qp=hi"
        );
        assert!(res.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn encrypted_listener_passes_through() {
        let res = server(ServerConfig::default(), "production")
            .router(Transport::Encrypted)
            .oneshot(request("/a/url"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn rejection_keeps_supplied_request_id() {
        let mut config = ServerConfig::default();
        config.enforcement.redirect = false;

        let mut req = request("/a/url");
        req.headers_mut().insert(X_REQUEST_ID, "abc-123".parse().unwrap());

        let res = server(config, "production")
            .router(Transport::Plain)
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn development_serves_plaintext() {
        let res = server(ServerConfig::default(), "development")
            .router(Transport::Plain)
            .oneshot(request("/a/url"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
