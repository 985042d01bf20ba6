//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use cors_relay::config::RelayConfig;
use cors_relay::http::HttpServer;
use cors_relay::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running relay bound to an ephemeral port.
pub struct RelayHandle {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<std::io::Result<()>>,
}

impl RelayHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Relay config that allows loopback upstreams.
pub fn loopback_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.relay.allowed_hosts = vec!["127.0.0.1".to_string()];
    config
}

pub async fn start_relay(config: RelayConfig) -> RelayHandle {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(listener, rx).await });

    RelayHandle { addr, shutdown, task }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Read one HTTP/1.1 request (head plus Content-Length body) off the socket.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&buf).into_owned();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Upstream that answers every request with `status` and the raw request
/// text as its body.
pub async fn start_echo_upstream(status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nX-Upstream: mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    request.len(),
                    request
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Upstream that sends `first` as one chunk, then waits for the returned
/// sender to fire before sending `rest` and ending the body.
pub async fn start_chunked_upstream(
    first: &'static str,
    rest: &'static str,
) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let _ = read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n{}\r\n",
            first.len(),
            first
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.flush().await;

        let _ = release_rx.await;

        let tail = format!("{:x}\r\n{}\r\n0\r\n\r\n", rest.len(), rest);
        let _ = socket.write_all(tail.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    (addr, release_tx)
}

/// Upstream that sends `first` as one chunk, then keeps writing a chunk
/// every 50ms until a write fails. The receiver fires once the connection
/// has been closed from the other side.
pub async fn start_endless_upstream(first: &'static str) -> (SocketAddr, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let _ = read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n{}\r\n",
            first.len(),
            first
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            let _ = closed_tx.send(());
            return;
        }

        loop {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let written = socket.write_all(b"4\r\nmore\r\n").await;
            if written.is_err() || socket.flush().await.is_err() {
                break;
            }
        }
        let _ = closed_tx.send(());
    });

    (addr, closed_rx)
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
