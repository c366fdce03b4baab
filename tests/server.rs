//! Serving a guarded router over a real socket.

use api_guard::config::{GuardOptions, ServerConfig};
use api_guard::http::{echo_router, HttpServer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_serve_and_shutdown() {
    let config = ServerConfig {
        guard: GuardOptions {
            blacklist: Some(vec!["10.255.255.1".into()]),
            ..Default::default()
        },
        ..Default::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, echo_router()).unwrap();
    let guard = server.guard();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run(listener, async {
        let _ = stop_rx.await;
    }));

    let health = raw_get(addr, "/health").await;
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(health.contains("x-frame-options: DENY"));

    let echo = raw_get(addr, "/anything").await;
    assert!(echo.contains(r#""path":"/anything""#));

    assert_eq!(guard.limiter().tracked_keys(), 1);

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_invalid_guard_config_fails_construction() {
    let mut config = ServerConfig::default();
    config.guard.rate_limit.window_ms = Some(0);
    let err = HttpServer::new(config, echo_router()).err().unwrap();
    assert!(err.to_string().contains("rate_limit.window_ms"));
}
