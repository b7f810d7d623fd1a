use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{Map, Value};

/// Error type for remote document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no remote url configured (set remote.url in config.toml or KB_REMOTE_URL)")]
    NotConfigured,
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {path} failed: {source}")]
    Http {
        method: Method,
        path: String,
        source: reqwest::Error,
    },
    #[error("{method} {path} returned {status}")]
    Status {
        method: Method,
        path: String,
        status: u16,
    },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

/// The four verbs the document store understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// A JSON document tree addressed by slash-separated paths.
///
/// `put` overwrites the subtree, `patch` shallow-merges the given fields into
/// it, `delete` removes it. Reading a path that holds nothing yields `None`.
pub trait RemoteStore: Send + Sync {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;
    fn put(&self, path: &str, doc: &Value) -> Result<(), StoreError>;
    fn patch(&self, path: &str, doc: &Value) -> Result<(), StoreError>;
    fn delete(&self, path: &str) -> Result<(), StoreError>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(path)
    }
    fn put(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        (**self).put(path, doc)
    }
    fn patch(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        (**self).patch(path, doc)
    }
    fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// REST client for a hosted JSON document store (`{base}/{path}.json`).
///
/// No retries and no batching; every call is one request.
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// `timeout` of `None` disables the client's default request timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Client)?;
        Ok(HttpStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a document path
    pub fn url_for(&self, path: &str) -> String {
        document_url(&self.base_url, path)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let started = Instant::now();
        let response = request.send().map_err(|source| {
            tracing::warn!(%method, path, error = %source, "remote request failed");
            StoreError::Http {
                method,
                path: path.to_string(),
                source,
            }
        })?;
        let status = response.status();
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "remote request"
        );
        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "remote request rejected");
            return Err(StoreError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// `https://host` + `board/tasks/task3` → `https://host/board/tasks/task3.json`
pub fn document_url(base_url: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("{}/.json", base_url.trim_end_matches('/'))
    } else {
        format!("{}/{}.json", base_url.trim_end_matches('/'), path)
    }
}

impl RemoteStore for HttpStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let response = self.send(Method::Get, path, self.client.get(self.url_for(path)))?;
        let text = response.text().map_err(|source| StoreError::Http {
            method: Method::Get,
            path: path.to_string(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Decode {
            path: path.to_string(),
            source,
        })?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    fn put(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        self.send(Method::Put, path, self.client.put(self.url_for(path)).json(doc))?;
        Ok(())
    }

    fn patch(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        self.send(
            Method::Patch,
            path,
            self.client.patch(self.url_for(path)).json(doc),
        )?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.send(Method::Delete, path, self.client.delete(self.url_for(path)))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// An in-process document tree with the same write semantics as the hosted
/// store: `null` and empty objects are never stored.
///
/// Records every request so callers can check write granularity, and can be
/// switched offline to make every request fail.
#[derive(Default)]
pub struct MemoryStore {
    root: Mutex<Map<String, Value>>,
    requests: Mutex<Vec<(Method, String)>>,
    offline: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing tree (must be an object to hold anything)
    pub fn with_root(root: Value) -> Self {
        let store = Self::default();
        if let Some(normalized) = normalize(root)
            && let Value::Object(map) = normalized
        {
            *lock(&store.root) = map;
        }
        store
    }

    /// Snapshot of the whole tree
    pub fn snapshot(&self) -> Value {
        Value::Object(lock(&self.root).clone())
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<(Method, String)> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// While offline every request fails with a 503
    pub fn set_offline(&self, offline: bool) {
        *lock(&self.offline) = offline;
    }

    fn record(&self, method: Method, path: &str) -> Result<(), StoreError> {
        lock(&self.requests).push((method, path.trim_matches('/').to_string()));
        if *lock(&self.offline) {
            return Err(StoreError::Status {
                method,
                path: path.to_string(),
                status: 503,
            });
        }
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Drop nulls and empty objects, recursively. `None` means "nothing to store".
fn normalize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| normalize(v).map(|v| (k, v)))
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Object(cleaned))
            }
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items.into_iter().filter_map(normalize).collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Array(cleaned))
            }
        }
        other => Some(other),
    }
}

/// Walk to the parent object of the last segment, creating objects on the way.
fn parent_mut<'a>(root: &'a mut Map<String, Value>, segs: &[&str]) -> &'a mut Map<String, Value> {
    let mut node = root;
    for seg in segs {
        let entry = node
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        node = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }
    node
}

/// Remove the node at `segs` and any parents left empty.
fn remove_at(node: &mut Map<String, Value>, segs: &[&str]) {
    match segs {
        [] => node.clear(),
        [last] => {
            node.shift_remove(*last);
        }
        [first, rest @ ..] => {
            let now_empty = match node.get_mut(*first) {
                Some(Value::Object(child)) => {
                    remove_at(child, rest);
                    child.is_empty()
                }
                _ => false,
            };
            if now_empty {
                node.shift_remove(*first);
            }
        }
    }
}

fn set_at(root: &mut Map<String, Value>, segs: &[&str], value: Value) {
    match segs.split_last() {
        None => {
            if let Value::Object(map) = value {
                *root = map;
            }
        }
        Some((last, parents)) => {
            parent_mut(root, parents).insert(last.to_string(), value);
        }
    }
}

impl RemoteStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.record(Method::Get, path)?;
        let root = lock(&self.root);
        let mut node: Option<&Value> = None;
        let mut map = &*root;
        let segs = segments(path);
        if segs.is_empty() {
            return Ok(normalize(Value::Object(root.clone())));
        }
        for (i, seg) in segs.iter().enumerate() {
            let child = match map.get(*seg) {
                Some(c) => c,
                None => return Ok(None),
            };
            if i + 1 == segs.len() {
                node = Some(child);
            } else {
                match child {
                    Value::Object(m) => map = m,
                    _ => return Ok(None),
                }
            }
        }
        Ok(node.cloned())
    }

    fn put(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        self.record(Method::Put, path)?;
        let segs = segments(path);
        let mut root = lock(&self.root);
        match normalize(doc.clone()) {
            Some(value) => set_at(&mut root, &segs, value),
            None => remove_at(&mut root, &segs),
        }
        Ok(())
    }

    fn patch(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        self.record(Method::Patch, path)?;
        let segs = segments(path);
        let fields = match doc {
            Value::Object(fields) => fields.clone(),
            _ => return Ok(()),
        };
        let mut root = lock(&self.root);
        for (key, value) in fields {
            let mut child_segs = segs.clone();
            child_segs.push(key.as_str());
            match normalize(value) {
                Some(v) => set_at(&mut root, &child_segs, v),
                None => remove_at(&mut root, &child_segs),
            }
        }
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.record(Method::Delete, path)?;
        let segs = segments(path);
        let mut root = lock(&self.root);
        remove_at(&mut root, &segs);
        Ok(())
    }
}
