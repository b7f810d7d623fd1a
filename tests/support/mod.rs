//! A local stand-in for the hosted document store: a plain HTTP/1.1 server
//! that maps `{path}.json` requests onto a `MemoryStore`.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use kanban::io::remote::{MemoryStore, RemoteStore};
use serde_json::Value;

pub struct DocServer {
    pub url: String,
    pub store: Arc<MemoryStore>,
}

impl DocServer {
    /// Serve on an ephemeral port until the test process exits
    pub fn start(root: Value) -> DocServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let store = Arc::new(MemoryStore::with_root(root));
        let served = store.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => serve(&served, stream),
                    Err(_) => break,
                }
            }
        });
        DocServer { url, store }
    }

    pub fn snapshot(&self) -> Value {
        self.store.snapshot()
    }
}

fn serve(store: &MemoryStore, stream: TcpStream) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/").to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let path = target
        .split('?')
        .next()
        .unwrap_or("")
        .trim_start_matches('/')
        .trim_end_matches(".json")
        .to_string();
    let doc: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let result = match method.as_str() {
        "GET" => store.get(&path).map(|v| v.unwrap_or(Value::Null)),
        "PUT" => store.put(&path, &doc).map(|_| doc),
        "PATCH" => store.patch(&path, &doc).map(|_| doc),
        "DELETE" => store.delete(&path).map(|_| Value::Null),
        _ => Ok(Value::Null),
    };
    let (status, body) = match result {
        Ok(value) => ("200 OK", value.to_string()),
        Err(_) => ("503 Service Unavailable", "{\"error\":\"offline\"}".to_string()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
