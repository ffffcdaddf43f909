//! Shared utilities for integration testing: mock lookup API, mock storage
//! backend, and a proxy instance bound to an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use artifact_proxy::config::ProxyConfig;
use artifact_proxy::{HttpServer, Shutdown};

/// One parsed request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub headers: HashMap<String, String>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }
}

/// A canned object served by the mock storage backend.
#[derive(Debug, Clone, Default)]
pub struct StorageObject {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StorageObject {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html".into()),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Handle onto a running mock lookup API.
pub struct MockLookup {
    pub addr: SocketAddr,
    pub calls: Arc<AtomicUsize>,
}

impl MockLookup {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Handle onto a running mock storage backend.
pub struct MockStorage {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockStorage {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<ReceivedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.lines();
    let request_line = lines.next()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    Some(ReceivedRequest { path, headers })
}

async fn write_response(
    socket: &mut TcpStream,
    status: u16,
    headers: &[(String, String)],
    body: &str,
) {
    let status_text = match status {
        200 => "200 OK",
        304 => "304 Not Modified",
        400 => "400 Bad Request",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let mut response = format!("HTTP/1.1 {status_text}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    // 304 must not carry a body.
    if status == 304 {
        response.push_str("Connection: close\r\n\r\n");
    } else {
        response.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ));
    }

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a mock lookup API answering `/v1/domains/?domain=X` from a fixed
/// table of (status, JSON body) pairs. Unknown domains get a 404.
pub async fn start_mock_lookup(responses: HashMap<String, (u16, String)>) -> MockLookup {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_inner = calls.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let responses = responses.clone();
            let calls = calls_inner.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                calls.fetch_add(1, Ordering::SeqCst);

                let domain = request
                    .path
                    .split_once("domain=")
                    .map(|(_, d)| d.split('&').next().unwrap_or(d).to_string());

                let (status, body) = domain
                    .and_then(|d| responses.get(&d).cloned())
                    .unwrap_or((404, "{\"detail\": \"not found\"}".to_string()));

                let headers = vec![("Content-Type".to_string(), "application/json".to_string())];
                write_response(&mut socket, status, &headers, &body).await;
            });
        }
    });

    MockLookup { addr, calls }
}

/// Start a mock storage backend serving canned objects by full request path
/// (`/{bucket}/{key}`). Paths not in the table get a 403, the way object
/// stores refuse unknown keys.
pub async fn start_mock_storage(objects: HashMap<String, StorageObject>) -> MockStorage {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let requests_inner = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let objects = objects.clone();
            let requests = requests_inner.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let object = objects
                    .get(&request.path)
                    .cloned()
                    .unwrap_or_else(|| StorageObject::with_status(403));
                requests.lock().unwrap().push(request);

                let mut headers = object.headers.clone();
                if let Some(ct) = &object.content_type {
                    headers.push(("Content-Type".to_string(), ct.clone()));
                }
                write_response(&mut socket, object.status, &headers, &object.body).await;
            });
        }
    });

    MockStorage { addr, requests }
}

/// Build a proxy config wired to the given mocks.
pub fn proxy_config(lookup: &MockLookup, storage: &MockStorage) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.lookup.api_url = lookup.url();
    config.lookup.api_token = "test-token".to_string();
    config.storage.endpoint = storage.endpoint();
    config.storage.bucket = "artifacts".to_string();
    config
}

/// Run the proxy on an ephemeral port; returns its address and the shutdown
/// handle keeping it alive.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Arc<Shutdown>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config).unwrap();

    let shutdown_inner = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, &shutdown_inner).await.unwrap();
    });

    (addr, shutdown)
}

/// Test client that resolves `domain` to the proxy address, so the Host
/// header carries a realistic request domain.
pub fn client_for(domain: &str, proxy_addr: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .resolve(domain, proxy_addr)
        .build()
        .unwrap()
}
