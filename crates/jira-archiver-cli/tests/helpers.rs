#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request as seen by [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

/// Minimal HTTP/1.1 server on a background thread. Every connection carries
/// one request and is closed after the response.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(request) = read_request(&mut stream) else { continue };
                let (status, body) = handler(&request);
                recorded.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest { method, target, headers, body: String::from_utf8_lossy(&body).into_owned() })
}

/// Jira fake with three projects:
/// - `AAA` (id 1) has old project metadata and no issues.
/// - `BBB` (id 2) has no signal at all.
/// - `CCC` (id 3) has an issue updated in the future, so it is always active.
///
/// Archiving a project id listed in `forbidden_ids` returns 403. Any other
/// archive call returns 202.
pub fn jira_stub(forbidden_ids: &'static [&'static str]) -> StubServer {
    StubServer::start(move |request| {
        match (request.method.as_str(), request.path()) {
            ("GET", "/rest/api/3/project/search") => (
                200,
                r#"{"startAt":0,"maxResults":50,"total":3,"isLast":true,"values":[
                    {"id":"1","key":"AAA","name":"Alpha","insight":{"lastIssueUpdateTime":"2019-01-01T00:00:00.000+0000"}},
                    {"id":"2","key":"BBB","name":"Beta"},
                    {"id":"3","key":"CCC","name":"Gamma"}
                ]}"#
                    .to_string(),
            ),
            ("POST", "/rest/api/3/search/jql") if request.body.contains("CCC") => (
                200,
                r#"{"issues":[{"id":"30","fields":{"updated":"2999-01-01T00:00:00.000+0000"}}]}"#.to_string(),
            ),
            ("POST", "/rest/api/3/search/jql") => (200, r#"{"issues":[]}"#.to_string()),
            ("POST", path) if path.starts_with("/rest/api/3/project/") && path.ends_with("/archive") => {
                let id = path
                    .trim_start_matches("/rest/api/3/project/")
                    .trim_end_matches("/archive");
                if forbidden_ids.contains(&id) {
                    (403, r#"{"errorMessages":["nope"]}"#.to_string())
                } else {
                    (202, String::new())
                }
            }
            _ => (404, r#"{"errorMessages":["not found"]}"#.to_string()),
        }
    })
}
