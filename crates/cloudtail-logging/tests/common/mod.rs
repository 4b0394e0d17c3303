//! Shared test doubles for the integration tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Minimal log-intake server recording every request body in arrival order.
///
/// mockito can match requests but not replay their bodies, so ordering and
/// timestamp assertions need this hand-rolled double. Responses can be stalled
/// (to pin the sink's delivery task mid-flight) and individual statuses can be
/// scripted.
pub struct MockIntake {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    release_tx: watch::Sender<bool>,
    statuses: Arc<Mutex<VecDeque<u16>>>,
}

impl MockIntake {
    /// Starts an intake that answers requests immediately.
    pub async fn start() -> Self {
        Self::start_inner(false).await
    }

    /// Starts an intake that holds every response until [`release`](Self::release)
    /// is called.
    pub async fn start_stalled() -> Self {
        Self::start_inner(true).await
    }

    async fn start_inner(stalled: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind intake listener");
        let addr = listener.local_addr().expect("listener has no address");

        let requests: Arc<Mutex<Vec<(String, serde_json::Value)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let statuses: Arc<Mutex<VecDeque<u16>>> = Arc::new(Mutex::new(VecDeque::new()));
        let (release_tx, release_rx) = watch::channel(!stalled);

        let accept_requests = Arc::clone(&requests);
        let accept_statuses = Arc::clone(&statuses);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(handle_connection(
                    stream,
                    Arc::clone(&accept_requests),
                    release_rx.clone(),
                    Arc::clone(&accept_statuses),
                ));
            }
        });

        Self {
            addr,
            requests,
            release_tx,
            statuses,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Lets held responses (and all future ones) proceed.
    pub fn release(&self) {
        let _ = self.release_tx.send(true);
    }

    /// Scripts the status of the next unanswered request; defaults to 202.
    pub fn push_status(&self, status: u16) {
        self.statuses
            .lock()
            .expect("lock poisoned")
            .push_back(status);
    }

    /// The (path, body) pairs received so far, in arrival order.
    pub fn requests(&self) -> Vec<(String, serde_json::Value)> {
        self.requests.lock().expect("lock poisoned").clone()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    requests: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    mut release_rx: watch::Receiver<bool>,
    statuses: Arc<Mutex<VecDeque<u16>>>,
) {
    let mut buf: Vec<u8> = Vec::new();

    loop {
        let headers_end = loop {
            if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
                break pos;
            }
            let mut chunk = [0u8; 4096];
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };

        let header_text = String::from_utf8_lossy(&buf[..headers_end]).to_string();
        let mut lines = header_text.lines();
        let request_line = lines.next().unwrap_or_default().to_string();
        let path = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();
        let content_length = lines
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = headers_end + 4;
        while buf.len() < body_start + content_length {
            let mut chunk = [0u8; 4096];
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let body = serde_json::from_slice(&buf[body_start..body_start + content_length])
            .unwrap_or(serde_json::Value::Null);
        buf.drain(..body_start + content_length);

        requests.lock().expect("lock poisoned").push((path, body));

        if release_rx.wait_for(|ready| *ready).await.is_err() {
            return;
        }

        let status = statuses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(202);
        let reason = if status < 300 { "Accepted" } else { "Error" };
        let response = format!("HTTP/1.1 {status} {reason}\r\ncontent-length: 0\r\n\r\n");
        if stream.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
