//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

use https_always::config::ServerConfig;
use https_always::enforcement::RuntimeEnvironment;
use https_always::{HttpServer, Shutdown};

pub const URL: &str = "/a/url?qp=hi";

/// A running server; dropping it shuts the server down.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://localhost:{}{}", self.addr.port(), path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a plaintext server on an ephemeral port. The only application
/// route is `/ping`, so `URL` reaches the 404 fallback unless intercepted.
pub async fn start_server(config: ServerConfig, environment: &str) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let routes = Router::new().route("/ping", get(|| async { "pong" }));
    let server = HttpServer::new(config, &RuntimeEnvironment::new(environment), routes);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestServer { addr, shutdown }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
