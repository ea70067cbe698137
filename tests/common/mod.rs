//! In-process relay stand-in that records requests and answers with canned responses

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// Canned answer for one request.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct CaptureState {
    responses: Arc<Mutex<VecDeque<CannedResponse>>>,
    requests: Sender<RecordedRequest>,
}

/// Fallback handler: every method and path lands here.
async fn record(
    State(state): State<CaptureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let _ = state.requests.send(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body: body.to_vec(),
    });

    let canned = state
        .responses
        .lock()
        .expect("canned responses lock")
        .pop_front();
    match canned {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body,
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Axum server on its own tokio runtime, answering with the canned
/// responses in order. Requests past the last one get 503.
pub struct CaptureServer {
    addr: SocketAddr,
    requests: Receiver<RecordedRequest>,
}

impl CaptureServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (addr_tx, addr_rx) = mpsc::channel();
        let state = CaptureState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: request_tx,
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("capture server runtime");
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind capture server");
                let addr = listener.local_addr().expect("capture server address");
                if addr_tx.send(addr).is_err() {
                    return;
                }

                let router = Router::new().fallback(record).with_state(state);
                axum::serve(listener, router).await.expect("capture server");
            });
        });

        let addr = addr_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("capture server did not start");
        Self {
            addr,
            requests: request_rx,
        }
    }

    /// Answer every request with `{"success": true}`.
    pub fn accepting(count: usize) -> Self {
        Self::start(vec![
            CannedResponse::json(200, serde_json::json!({"success": true}));
            count
        ])
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn next_request(&self) -> RecordedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("no request reached the capture server")
    }

    /// Requests received so far that nobody has taken yet.
    pub fn pending_requests(&self) -> usize {
        self.requests.try_iter().count()
    }
}

/// An address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}")
}
