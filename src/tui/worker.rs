use std::sync::mpsc;
use std::thread;

use crate::io::board_client::BoardClient;
use crate::model::board::Board;
use crate::ops::cache::ReloadTicket;
use crate::ops::store::Mutation;

/// How to undo a change that was shown before the remote write finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollback {
    pub key: String,
    pub previous_state: String,
}

/// Work sent from the event loop to the store thread
#[derive(Debug)]
pub enum Request {
    Reload(ReloadTicket),
    Commit {
        mutation: Mutation,
        rollback: Option<Rollback>,
    },
}

/// Results sent back, in request order
#[derive(Debug)]
pub enum Reply {
    Reloaded {
        ticket: ReloadTicket,
        result: Result<Board, String>,
    },
    Committed {
        mutation: Mutation,
        rollback: Option<Rollback>,
        error: Option<String>,
    },
}

/// Perform one request against the remote store
pub fn handle(client: &BoardClient, request: Request) -> Reply {
    match request {
        Request::Reload(ticket) => Reply::Reloaded {
            ticket,
            result: client.fetch_all().map_err(|e| e.to_string()),
        },
        Request::Commit { mutation, rollback } => {
            let error = match mutation.send(client) {
                Ok(()) => {
                    tracing::info!(change = %mutation.describe(), "committed");
                    None
                }
                Err(e) => {
                    tracing::warn!(change = %mutation.describe(), error = %e, "remote write failed");
                    Some(e.to_string())
                }
            };
            Reply::Committed {
                mutation,
                rollback,
                error,
            }
        }
    }
}

/// A background thread that owns all remote I/O so the terminal never
/// blocks on the network. Requests are handled one at a time, in the order
/// they were sent.
pub struct Worker {
    tx: mpsc::Sender<Request>,
    rx: mpsc::Receiver<Reply>,
}

impl Worker {
    pub fn spawn(client: BoardClient) -> std::io::Result<Self> {
        let (tx, requests) = mpsc::channel::<Request>();
        let (replies, rx) = mpsc::channel();
        thread::Builder::new()
            .name("kb-store".into())
            .spawn(move || {
                for request in requests {
                    if replies.send(handle(&client, request)).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Worker { tx, rx })
    }

    pub fn send(&self, request: Request) {
        if self.tx.send(request).is_err() {
            tracing::warn!("store worker has stopped");
        }
    }

    /// Non-blocking poll for finished requests.
    /// Returns all queued replies (may be empty).
    pub fn poll(&self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }

    #[cfg(test)]
    fn wait(&self) -> Option<Reply> {
        self.rx.recv_timeout(std::time::Duration::from_secs(5)).ok()
    }
}
