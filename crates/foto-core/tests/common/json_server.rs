//! Minimal HTTP/1.1 server for client integration tests.
//!
//! Maps request paths to canned (status, body) pairs; unknown paths get 404.
//! Records every requested path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone, Default)]
pub struct Routes {
    routes: HashMap<String, (u16, String)>,
}

impl Routes {
    pub fn json(mut self, path: &str, body: &str) -> Self {
        self.routes.insert(path.to_string(), (200, body.to_string()));
        self
    }

    pub fn status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(path.to_string(), (status, body.to_string()));
        self
    }
}

pub struct JsonServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(routes: Routes) -> JsonServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    JsonServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    seen.lock().unwrap().push(path.clone());

    let (status, body) = routes
        .routes
        .get(&path)
        .cloned()
        .unwrap_or((404, "not found".to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
