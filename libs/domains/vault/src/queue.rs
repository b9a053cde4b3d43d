use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{VaultError, VaultResult};

/// Hands record ids to the external processing worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, item: &str) -> VaultResult<()>;
}

/// `LPUSH <queue> <id>` bounded by a timeout.
#[derive(Clone)]
pub struct RedisWorkQueue {
    conn: ConnectionManager,
    queue: String,
    timeout: Duration,
}

impl RedisWorkQueue {
    pub fn new(conn: ConnectionManager, queue: impl Into<String>, timeout: Duration) -> Self {
        Self {
            conn,
            queue: queue.into(),
            timeout,
        }
    }
}

#[async_trait]
impl WorkQueue for RedisWorkQueue {
    async fn enqueue(&self, item: &str) -> VaultResult<()> {
        let mut conn = self.conn.clone();

        match tokio::time::timeout(self.timeout, conn.lpush::<_, _, i64>(&self.queue, item)).await {
            Ok(Ok(depth)) => {
                tracing::debug!(queue = %self.queue, depth, "Enqueued item");
                Ok(())
            }
            Ok(Err(e)) => Err(VaultError::Dependency(format!("Queue push failed: {}", e))),
            Err(_) => Err(VaultError::Dependency(format!(
                "Queue push timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

/// In-memory WorkQueue (for development/testing). Newest item first, like LPUSH.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkQueue {
    items: Arc<Mutex<Vec<String>>>,
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn items(&self) -> Vec<String> {
        self.items.lock().await.clone()
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn enqueue(&self, item: &str) -> VaultResult<()> {
        self.items.lock().await.insert(0, item.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_queue_pushes_to_front() {
        let queue = InMemoryWorkQueue::new();
        queue.enqueue("first").await.unwrap();
        queue.enqueue("second").await.unwrap();

        assert_eq!(queue.items().await, vec!["second", "first"]);
    }
}
