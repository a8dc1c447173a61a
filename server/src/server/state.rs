//! Shared application state exposed to the websocket handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use golf_shared::ServerMsg;

use crate::server::actor::ManagerRequest;

/// Registry of live connections by registered username. Entries appear at
/// `register` and vanish on disconnect; the user stays registered in the
/// engine so they can resume on reconnect.
#[derive(Default)]
pub struct Connections {
    senders: RwLock<HashMap<String, mpsc::UnboundedSender<ServerMsg>>>,
}

impl Connections {
    pub async fn insert(&self, username: &str, tx: mpsc::UnboundedSender<ServerMsg>) {
        self.senders.write().await.insert(username.to_string(), tx);
    }

    pub async fn remove(&self, username: &str) {
        self.senders.write().await.remove(username);
    }

    pub async fn contains(&self, username: &str) -> bool {
        self.senders.read().await.contains_key(username)
    }

    /// Deliver `msg` to `username` if they are connected. A closed channel
    /// just means the socket is mid-teardown.
    pub async fn send_to(&self, username: &str, msg: ServerMsg) {
        if let Some(tx) = self.senders.read().await.get(username) {
            let _ = tx.send(msg);
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub manager: mpsc::Sender<ManagerRequest>,
    pub connections: Arc<Connections>,
}

impl AppState {
    pub fn new(manager: mpsc::Sender<ManagerRequest>) -> Self {
        Self {
            manager,
            connections: Arc::new(Connections::default()),
        }
    }
}
