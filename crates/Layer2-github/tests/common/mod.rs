//! Minimal in-process HTTP stub for exercising the GitHub client

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.into().into_bytes(),
        }
    }

    pub fn raw(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: vec![(
                "content-type".to_string(),
                "application/octet-stream".to_string(),
            )],
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            ..Self::json(body)
        }
    }

    /// `{base}` in header values is replaced with the server's base URL
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Request line target plus headers (names lowercased)
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub target: String,
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Routes are keyed by request target, e.g. `/repos/o/r?x=1`
    pub async fn start(routes: HashMap<String, StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(Mutex::new(Vec::new()));

        let routes = Arc::new(routes);
        let server_hits = hits.clone();
        let server_base = base_url.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                let hits = server_hits.clone();
                let base = server_base.clone();
                tokio::spawn(async move {
                    let _ = handle(socket, &routes, &hits, &base).await;
                });
            }
        });

        Self { base_url, hits }
    }

    pub fn hits(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.target).collect()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.hits.lock().unwrap().clone()
    }
}

async fn handle(
    mut socket: TcpStream,
    routes: &HashMap<String, StubResponse>,
    hits: &Mutex<Vec<RecordedRequest>>,
    base: &str,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut lines = head.split("\r\n");
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    hits.lock().unwrap().push(RecordedRequest {
        target: target.clone(),
        headers,
    });

    let response = routes
        .get(&target)
        .cloned()
        .unwrap_or_else(|| StubResponse::status(404, r#"{"message": "Not Found"}"#));

    let mut out = format!(
        "HTTP/1.1 {} Stub\r\ncontent-length: {}\r\nconnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        out.push_str(&format!("{}: {}\r\n", name, value.replace("{base}", base)));
    }
    out.push_str("\r\n");

    socket.write_all(out.as_bytes()).await?;
    socket.write_all(&response.body).await?;
    socket.shutdown().await
}
