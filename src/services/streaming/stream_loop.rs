// File: src/services/streaming/stream_loop.rs
use super::registry::ConnectionId;
use crate::error::ServiceError;
use crate::services::generator::record_generator::SettingGenerator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Lifecycle of one streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Open,
    Closed,
}

/// Pushes one freshly generated record per interval to a single connection.
#[derive(Clone)]
pub struct StreamLoop {
    generator: Arc<SettingGenerator>,
    interval: Duration,
}

impl StreamLoop {
    pub fn new(generator: Arc<SettingGenerator>, interval: Duration) -> Self {
        Self {
            generator,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs until `cancel` fires (`Ok`) or the outbound queue is closed
    /// (`ConnectionLost`). The first record goes out immediately.
    pub async fn run<M>(
        &self,
        id: ConnectionId,
        outbound: &mpsc::Sender<M>,
        cancel: &CancellationToken,
    ) -> Result<(), ServiceError>
    where
        M: From<String> + Send,
    {
        let mut sent: u64 = 0;

        loop {
            let record = self.generator.generate();
            let payload = serde_json::to_string(&record)?;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = outbound.send(M::from(payload)) => {
                    if result.is_err() {
                        debug!("Connection {} stopped accepting records after {}", id, sent);
                        return Err(ServiceError::ConnectionLost(id));
                    }
                    sent += 1;
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        debug!("Stream for connection {} cancelled after {} record(s)", id, sent);
        Ok(())
    }
}
