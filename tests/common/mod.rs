// Test fixtures: an in-process axum server that records every request
// it receives and answers with scripted status codes.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

use listing_photo_uploader::config::Config;

/// A request as seen by the test server, with its multipart fields decoded.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub fields: Vec<FormField>,
}

/// One decoded multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Multipart fields in the order they were sent.
    pub fn form_fields(&self) -> Vec<FormField> {
        self.fields.clone()
    }

    pub fn field(&self, name: &str) -> Option<FormField> {
        self.fields.iter().find(|f| f.name == name).cloned()
    }
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    statuses: Arc<Mutex<VecDeque<u16>>>,
}

/// Server bound to an ephemeral port on localhost, running on its own
/// tokio runtime in a background thread.
pub struct TestServer {
    addr: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl TestServer {
    /// Start a server answering `200 OK` to every request.
    pub fn start() -> Self {
        Self::with_statuses(Vec::new())
    }

    /// Start a server answering with `statuses` in order, then `200 OK`.
    pub fn with_statuses(statuses: Vec<u16>) -> Self {
        let state = ServerState {
            requests: Arc::default(),
            statuses: Arc::new(Mutex::new(VecDeque::from(statuses))),
        };
        let requests = Arc::clone(&state.requests);
        let app = Router::new().fallback(capture).with_state(state);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind test server");
                tx.send(listener.local_addr().unwrap().to_string()).unwrap();
                axum::serve(listener, app).await.expect("serve");
            });
        });
        let addr = rx.recv().expect("test server address");

        TestServer { addr, requests }
    }

    /// Base URL to configure as an environment, e.g. `http://127.0.0.1:4567/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn capture(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> StatusCode {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await.expect("field body").to_vec();
        fields.push(FormField {
            name,
            filename,
            data,
        });
    }

    state.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect(),
        fields,
    });

    let status = state.statuses.lock().unwrap().pop_front().unwrap_or(200);
    StatusCode::from_u16(status).unwrap()
}

/// Config pointing both environments at the given servers and photos at `root`.
pub fn test_config(staging: &TestServer, production: &TestServer, root: &Path) -> Config {
    Config {
        staging_url: staging.base_url(),
        production_url: production.base_url(),
        photo_root: root.to_path_buf(),
        environment: None,
        timeout: Some(Duration::from_secs(10)),
    }
}

/// Create `<root>/<property>/<name>` for every `(name, bytes)` pair.
pub fn write_photos(root: &Path, property: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let dir = root.join(property);
    std::fs::create_dir_all(&dir).unwrap();
    for (name, bytes) in files {
        std::fs::write(dir.join(name), bytes).unwrap();
    }
    dir
}
