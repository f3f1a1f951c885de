// persist.rs — PersistQueue: fire-and-forget, last-write-wins persistence.
//
// Every mutation hands the queue a full serialized snapshot. The queue keeps
// only the newest one in a watch channel; a single background task wakes up,
// takes whatever is newest, and writes it on the blocking pool. Snapshots
// that are superseded before the writer gets to them are never written.
// Because each payload is the whole list, skipping them loses nothing.
//
// Generations let callers wait for the queue to drain (`flush`), which the
// CLI does before exiting and tests do before inspecting storage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gt_storage::KeyValueStore;
use tokio::runtime::Handle;
use tokio::sync::watch;

#[derive(Debug, Clone)]
struct PendingWrite {
    generation: u64,
    payload: String,
}

/// Background writer for one storage key.
pub struct PersistQueue {
    key: String,
    pending: watch::Sender<Option<PendingWrite>>,
    written: watch::Receiver<u64>,
    generation: AtomicU64,
}

impl PersistQueue {
    /// Start the writer task for `key` on `runtime`.
    pub fn spawn(
        runtime: &Handle,
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let (pending_tx, pending_rx) = watch::channel(None);
        let (written_tx, written_rx) = watch::channel(0);

        runtime.spawn(run_writer(storage, key.clone(), pending_rx, written_tx));

        Self {
            key,
            pending: pending_tx,
            written: written_rx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue `payload` as the next value for the key. Returns its generation.
    ///
    /// Never blocks and never fails; write errors are logged by the writer.
    pub fn enqueue(&self, payload: String) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.send_replace(Some(PendingWrite {
            generation,
            payload,
        }));
        generation
    }

    /// Generation of the most recent enqueue (0 if nothing was queued).
    pub fn queued_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Generation the writer has most recently finished with.
    #[cfg(test)]
    fn written_generation(&self) -> u64 {
        *self.written.borrow()
    }

    /// Wait until everything queued so far has been written or dropped.
    pub async fn flush(&self) {
        let target = self.queued_generation();
        let mut written = self.written.clone();
        if written.wait_for(|done| *done >= target).await.is_err() {
            tracing::warn!(key = %self.key, "persistence writer stopped before flush completed");
        }
    }
}

async fn run_writer(
    storage: Arc<dyn KeyValueStore>,
    key: String,
    mut pending: watch::Receiver<Option<PendingWrite>>,
    written: watch::Sender<u64>,
) {
    while pending.changed().await.is_ok() {
        let Some(write) = pending.borrow_and_update().clone() else {
            continue;
        };

        let storage = Arc::clone(&storage);
        let write_key = key.clone();
        let payload = write.payload;
        let bytes = payload.len();
        let result =
            tokio::task::spawn_blocking(move || storage.set(&write_key, &payload)).await;

        match result {
            Ok(Ok(())) => {
                tracing::debug!(key = %key, generation = write.generation, bytes, "persisted goals");
            }
            Ok(Err(e)) => {
                tracing::warn!(key = %key, generation = write.generation, "failed to persist goals: {}", e);
            }
            Err(e) => {
                tracing::warn!(key = %key, generation = write.generation, "persistence write aborted: {}", e);
            }
        }

        written.send_replace(write.generation);
    }
    tracing::debug!(key = %key, "persistence writer exiting");
}
