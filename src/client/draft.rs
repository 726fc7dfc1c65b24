use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use super::{
    profile::{Draft, MarketRole},
    storage::{draft_key, KeyValueStore},
};

pub const DRAFT_QUIET_PERIOD: Duration = Duration::from_secs(2);

/// Coalesces rapid draft saves into one storage write once input has been
/// quiet for a while. Last write wins.
pub struct DraftAutosaver {
    tx: mpsc::UnboundedSender<(MarketRole, Draft)>,
    task: JoinHandle<()>,
}

impl DraftAutosaver {
    pub fn spawn<S>(store: Arc<S>, quiet: Duration) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx, quiet));
        Self { tx, task }
    }

    pub fn save(&self, role: MarketRole, draft: Draft) {
        if self.tx.send((role, draft)).is_err() {
            warn!(%role, "draft autosaver has stopped; dropping draft");
        }
    }

    /// Stops the task without writing what is pending.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Writes any pending draft and stops the task.
    pub async fn flush(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!(error = %e, "draft autosaver task failed");
        }
    }
}

async fn run<S: KeyValueStore>(
    store: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<(MarketRole, Draft)>,
    quiet: Duration,
) {
    let mut pending: Option<(MarketRole, Draft)> = None;
    loop {
        let Some((role, draft)) = pending.take() else {
            match rx.recv().await {
                Some(next) => {
                    pending = Some(next);
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(next) => {
                    if next.0 != role {
                        write(&*store, role, &draft);
                    }
                    pending = Some(next);
                }
                None => {
                    write(&*store, role, &draft);
                    break;
                }
            },
            _ = tokio::time::sleep(quiet) => write(&*store, role, &draft),
        }
    }
}

fn write<S: KeyValueStore>(store: &S, role: MarketRole, draft: &Draft) {
    if draft.is_empty() {
        return;
    }
    debug!(%role, fields = draft.0.len(), "saving draft");
    store.set_json(&draft_key(role), draft);
}
