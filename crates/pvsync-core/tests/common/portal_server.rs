//! Minimal HTTP/1.1 server standing in for the results portal in integration tests.
//!
//! Serves fixed bodies by path. A path can be told to answer 500 for its
//! first N requests. Every request is counted per path, and the last
//! User-Agent seen per path is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct State {
    bodies: HashMap<String, Vec<u8>>,
    fail_first: HashMap<String, usize>,
    hits: HashMap<String, usize>,
    user_agents: HashMap<String, String>,
}

#[derive(Clone)]
pub struct PortalServer {
    pub base_url: String,
    state: Arc<Mutex<State>>,
}

impl PortalServer {
    /// Binds to an ephemeral port and serves until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    pub fn serve(&self, path: &str, body: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .bodies
            .insert(path.to_string(), body.to_vec());
    }

    pub fn fail_first(&self, path: &str, n: usize) {
        self.state
            .lock()
            .unwrap()
            .fail_first
            .insert(path.to_string(), n);
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn user_agent(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().user_agents.get(path).cloned()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (path, user_agent) = parse_request(request);

    let (status, body) = {
        let mut st = state.lock().unwrap();
        let hit = {
            let h = st.hits.entry(path.clone()).or_insert(0);
            *h += 1;
            *h
        };
        if let Some(ua) = user_agent {
            st.user_agents.insert(path.clone(), ua);
        }
        let failing = st.fail_first.get(&path).copied().unwrap_or(0);
        let reply = match st.bodies.get(&path) {
            Some(_) if hit <= failing => ("500 Internal Server Error", Vec::new()),
            Some(body) => ("200 OK", body.clone()),
            None => ("404 Not Found", Vec::new()),
        };
        reply
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

/// Returns (path, User-Agent) from the request head.
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let user_agent = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, v)| v.trim().to_string());
    (path, user_agent)
}
