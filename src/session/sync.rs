// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::task::spawn_blocking;

use crate::records::RecordStore;
use crate::types::card_id::CardId;
use crate::types::srs_state::SrsState;

/// Resolves once a dispatched record has been written, or has failed to be.
pub type SyncReceipt = oneshot::Receiver<()>;

struct SyncJob {
    id: CardId,
    state: SrsState,
    done: oneshot::Sender<()>,
}

/// Writes review states to the record store in the background, in the order
/// they were dispatched. Failures are logged and otherwise ignored: the
/// in-memory state is authoritative for the rest of the session.
pub struct Syncer {
    store: Arc<dyn RecordStore>,
    /// Absent when created outside a tokio runtime, in which case records are
    /// written inline.
    jobs: Option<mpsc::UnboundedSender<SyncJob>>,
    worker: Option<JoinHandle<()>>,
}

impl Syncer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (jobs, worker) = match Handle::try_current() {
            Ok(handle) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let worker = handle.spawn(sync_worker(store.clone(), rx));
                (Some(tx), Some(worker))
            }
            Err(_) => (None, None),
        };
        Self {
            store,
            jobs,
            worker,
        }
    }

    /// Queues a record for saving and returns without waiting for it.
    pub fn dispatch(&self, id: CardId, state: SrsState) -> Option<SyncReceipt> {
        if let Some(jobs) = &self.jobs {
            let (done, receipt) = oneshot::channel();
            match jobs.send(SyncJob { id, state, done }) {
                Ok(()) => return Some(receipt),
                Err(mpsc::error::SendError(job)) => {
                    log::warn!("Sync worker is gone, saving '{}' inline.", job.id);
                    save(self.store.as_ref(), &job.id, &job.state);
                    return None;
                }
            }
        }
        save(self.store.as_ref(), &id, &state);
        None
    }

    /// Stops accepting records and waits until every queued one is written.
    pub async fn close(self) {
        let Self { jobs, worker, .. } = self;
        drop(jobs);
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                log::error!("Sync worker failed: {e}");
            }
        }
    }
}

async fn sync_worker(store: Arc<dyn RecordStore>, mut rx: mpsc::UnboundedReceiver<SyncJob>) {
    while let Some(job) = rx.recv().await {
        let store = store.clone();
        let SyncJob { id, state, done } = job;
        let result = spawn_blocking(move || save(store.as_ref(), &id, &state)).await;
        if let Err(e) = result {
            log::error!("Sync task failed: {e}");
        }
        let _ = done.send(());
    }
    log::debug!("Sync worker stopped.");
}

fn save(store: &dyn RecordStore, id: &CardId, state: &SrsState) {
    match store.save_record(id, state) {
        Ok(()) => log::debug!("Saved review state for '{id}'."),
        Err(e) => log::error!("Failed to save review state for '{id}': {e}"),
    }
}
