//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/200`: text/plain, `X-Single: foobar`, `X-Double: 1` and `X-Double: 2`, body `1.0.0`
//! - `/404`: empty 404
//! - `/restricted`: 200 with `Authorization: Zm9vOmJhcg==`, otherwise 403
//! - `/utf-8/200`, `/utf-16/200`: text/plain with that charset
//! - `/x509-ca-cert/200`: application/x-x509-ca-cert
//! - `/redirect`: 302 to `/200`
//! - `/flaky`: drops the connection for the first `fail_first` requests, then `/200`

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct TestServer {
    pub base: String,
    flaky_hits: Arc<AtomicU32>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Requests seen on `/flaky`, dropped ones included.
    pub fn flaky_hits(&self) -> u32 {
        self.flaky_hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start() -> TestServer {
    start_with_flaky(0)
}

/// Like `start`, but `/flaky` drops the first `fail_first` connections.
pub fn start_with_flaky(fail_first: u32) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let flaky_hits = Arc::new(AtomicU32::new(0));
    let hits = Arc::clone(&flaky_hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &hits, fail_first));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}/", port),
        flaky_hits,
    }
}

fn handle(mut stream: TcpStream, flaky_hits: &AtomicU32, fail_first: u32) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, authorization) = parse_request(request);

    let (status, headers, body): (&str, Vec<(&str, &str)>, &str) = match path {
        "/200" => (
            "200 OK",
            vec![
                ("Content-Type", "text/plain"),
                ("X-Single", "foobar"),
                ("X-Double", "1"),
                ("X-Double", "2"),
            ],
            "1.0.0",
        ),
        "/restricted" if authorization.as_deref() == Some("Zm9vOmJhcg==") => {
            ("200 OK", vec![("Content-Type", "text/plain")], "1.0.0")
        }
        "/restricted" => ("403 Forbidden", vec![], ""),
        "/utf-8/200" => (
            "200 OK",
            vec![("Content-Type", "text/html; charset=utf-8")],
            "1.0.0",
        ),
        "/utf-16/200" => (
            "200 OK",
            vec![("Content-Type", "application/json; charset=UTF-16")],
            "\"1.0.0\"",
        ),
        "/x509-ca-cert/200" => (
            "200 OK",
            vec![("Content-Type", "application/x-x509-ca-cert")],
            "pem",
        ),
        "/redirect" => ("302 Found", vec![("Location", "/200")], ""),
        "/flaky" => {
            let seen = flaky_hits.fetch_add(1, Ordering::SeqCst);
            if seen < fail_first {
                // Close without a response; curl reports an empty reply.
                return;
            }
            ("200 OK", vec![("Content-Type", "text/plain")], "recovered")
        }
        _ => ("404 Not Found", vec![], ""),
    };

    let mut response = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\n", status, body.len());
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("Connection: close\r\n\r\n");
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

/// Returns (path, optional Authorization header value).
fn parse_request(request: &str) -> (&str, Option<String>) {
    let mut path = "";
    let mut authorization = None;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if i == 0 {
            path = line.split_whitespace().nth(1).unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }
    (path, authorization)
}
