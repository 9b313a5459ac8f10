#![allow(dead_code)]

use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

const READ_TIMEOUT: Duration = Duration::from_millis(500);
const MAX_READ_DURATION: Duration = Duration::from_secs(6);
const MAX_HEADER_BYTES: usize = 64 * 1024;
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .count()
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }
}

/// Canned reply for one connection.
pub struct Reply {
    raw: String,
    delay: Duration,
}

impl Reply {
    pub fn json(status: &str, body: &str) -> Self {
        Self {
            raw: response_with_body(status, &[("Content-Type", "application/json")], body),
            delay: Duration::ZERO,
        }
    }

    pub fn with_headers(status: &str, headers: &[(&str, &str)], body: &str) -> Self {
        Self {
            raw: response_with_body(status, headers, body),
            delay: Duration::ZERO,
        }
    }

    pub fn empty(status: &str) -> Self {
        Self {
            raw: format!("HTTP/1.1 {status}\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

impl MockServer {
    /// Waits for the next request the server captured.
    pub async fn next_request(&mut self) -> CapturedRequest {
        timeout(REQUEST_TIMEOUT, self.requests.recv())
            .await
            .expect("request timeout")
            .expect("request")
    }

    /// Requests captured so far that were not yet taken with `next_request`.
    pub fn drain(&mut self) -> Vec<CapturedRequest> {
        let mut drained = Vec::new();
        while let Ok(req) = self.requests.try_recv() {
            drained.push(req);
        }
        drained
    }
}

/// Serves `replies` in order, one connection each, then stops listening.
pub async fn serve(replies: Vec<Reply>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for reply in replies {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let req = read_request(&mut stream).await;
            let _ = tx.send(req);
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let _ = stream.write_all(reply.raw.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    MockServer {
        base_url: format!("http://{}", addr),
        requests: rx,
    }
}

pub async fn serve_once(reply: Reply) -> MockServer {
    serve(vec![reply]).await
}

/// Accepts one connection, reads the request and never answers.
pub async fn serve_stalled(hold: Duration) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let req = read_request(&mut stream).await;
            let _ = tx.send(req);
            tokio::time::sleep(hold).await;
        }
    });

    MockServer {
        base_url: format!("http://{}", addr),
        requests: rx,
    }
}

/// An address nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn response_with_body(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\nConnection: close\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!("Content-Length: {}\r\n\r\n{}", body.len(), body));
    response
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let mut header_end = None;
    let deadline = Instant::now() + MAX_READ_DURATION;
    loop {
        if buf.len() >= MAX_HEADER_BYTES {
            panic!("request headers too large");
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            panic!("timed out reading request headers");
        }
        let read = match timeout(remaining.min(READ_TIMEOUT), stream.read(&mut chunk)).await {
            Ok(Ok(read)) => read,
            Ok(Err(e)) => panic!("read_request I/O error: {e}"),
            Err(_) => continue,
        };
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
        let start = buf.len().saturating_sub(read + 3);
        if let Some(pos) = find_header_end(&buf, start) {
            header_end = Some(pos);
            break;
        }
    }

    let Some(header_end) = header_end else {
        return CapturedRequest {
            method: "<incomplete>".to_string(),
            path: "<eof>".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        };
    };
    let header_str = String::from_utf8_lossy(&buf[..header_end]);
    let mut lines = header_str.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut headers = Vec::new();
    let mut content_length: usize = 0;
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name.to_string(), value.to_string()));
        }
    }
    if content_length > MAX_BODY_BYTES {
        panic!(
            "request body too large: {} > {} bytes",
            content_length, MAX_BODY_BYTES
        );
    }

    let mut body = buf[header_end..].to_vec();
    body.truncate(content_length);
    while body.len() < content_length {
        let remaining_time = deadline.saturating_duration_since(Instant::now());
        if remaining_time.is_zero() {
            break;
        }
        let read = match timeout(remaining_time.min(READ_TIMEOUT), stream.read(&mut chunk)).await {
            Ok(Ok(read)) => read,
            Ok(Err(e)) => panic!("read_request body I/O error: {e}"),
            Err(_) => continue,
        };
        if read == 0 {
            break;
        }
        let take = read.min(content_length - body.len());
        body.extend_from_slice(&chunk[..take]);
    }
    if body.len() < content_length {
        panic!(
            "read_request body incomplete: expected {content_length} bytes, got {} bytes",
            body.len()
        );
    }

    CapturedRequest {
        method,
        path,
        headers,
        body,
    }
}

fn find_header_end(buf: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i + 3 < buf.len() {
        if &buf[i..i + 4] == b"\r\n\r\n" {
            return Some(i + 4);
        }
        i += 1;
    }
    None
}
