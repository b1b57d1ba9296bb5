// File: src/services/streaming/registry.rs
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Registration-order identifier of a streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ConnectionHandle<M> {
    outbound: mpsc::Sender<M>,
    cancel: CancellationToken,
}

/// What a connection gets back from `register`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: ConnectionId,
    /// Cancelled on deregistration and on registry shutdown.
    pub cancel: CancellationToken,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Active set of streaming connections, injected through `AppState`.
///
/// Handles are kept in a `BTreeMap` keyed by id so iteration follows
/// registration order. Broadcast works on a snapshot, so register/deregister
/// may run concurrently with it.
pub struct ConnectionRegistry<M> {
    connections: RwLock<BTreeMap<ConnectionId, ConnectionHandle<M>>>,
    next_id: AtomicU64,
    shutdown: CancellationToken,
}

impl<M: Clone + Send> ConnectionRegistry<M> {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn register(&self, outbound: mpsc::Sender<M>) -> Registration {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = self.shutdown.child_token();

        let mut connections = self.connections.write().await;
        connections.insert(
            id,
            ConnectionHandle {
                outbound,
                cancel: cancel.clone(),
            },
        );
        info!("Connection {} registered ({} active)", id, connections.len());

        Registration { id, cancel }
    }

    /// Returns `false` when the connection was already gone.
    pub async fn deregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id);

        match removed {
            Some(handle) => {
                handle.cancel.cancel();
                info!("Connection {} deregistered", id);
                true
            }
            None => {
                debug!("Connection {} already deregistered", id);
                false
            }
        }
    }

    /// Sends `message` to every registered connection. A full or closed queue
    /// only affects that connection; closed ones are dropped from the set.
    pub async fn broadcast(&self, message: M) -> BroadcastReport {
        let targets: Vec<(ConnectionId, mpsc::Sender<M>)> = {
            let connections = self.connections.read().await;
            connections
                .iter()
                .map(|(id, handle)| (*id, handle.outbound.clone()))
                .collect()
        };

        let mut report = BroadcastReport::default();
        let mut closed = Vec::new();

        for (id, outbound) in targets {
            match outbound.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Broadcast to connection {} skipped: outbound queue full", id);
                    report.failed += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    warn!("Broadcast to connection {} failed: connection closed", id);
                    report.failed += 1;
                    closed.push(id);
                }
            }
        }

        for id in closed {
            self.deregister(id).await;
        }

        debug!(
            "Broadcast delivered to {} connection(s), {} failed",
            report.delivered, report.failed
        );
        report
    }

    /// Sends a final message to everyone, then cancels every connection.
    pub async fn close_all(&self, message: M) -> BroadcastReport {
        let report = self.broadcast(message).await;
        self.shutdown.cancel();
        info!("Registry closed {} connection(s)", report.delivered + report.failed);
        report
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    #[cfg(test)]
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }
}

impl<M: Clone + Send> Default for ConnectionRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}
