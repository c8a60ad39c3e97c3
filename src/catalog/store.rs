use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::catalog::parse::decode_catalog;
use crate::catalog::snapshot::CatalogSnapshot;
use crate::catalog::source::{CatalogSource, SourceError};
use crate::catalog::CatalogError;
use crate::types::CatalogVersion;

/// Outcome of a successful load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: Arc<CatalogSnapshot>,
    /// False when a later load committed first and this result was discarded.
    pub committed: bool,
    pub skipped_records: usize,
}

/// Holds the committed catalog snapshot and is its only writer.
///
/// Every load draws a ticket from a monotonically increasing counter. A
/// finished load is committed only if its ticket is newer than the committed
/// snapshot's generation, so the most recently requested load always wins no
/// matter which one completes first. That applies to failures as well: a
/// stale failure never clears a newer catalog.
pub struct CatalogStore {
    source: Box<dyn CatalogSource>,
    tickets: AtomicU64,
    current: watch::Sender<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn CatalogSource>) -> Self {
        let initial = Arc::new(CatalogSnapshot::unloaded(source.describe()));
        Self {
            source,
            tickets: AtomicU64::new(0),
            current: watch::Sender::new(initial),
        }
    }

    /// The committed snapshot. Cheap; never waits on an in-flight load.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.borrow().clone()
    }

    /// Notified every time a new snapshot is committed.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.current.subscribe()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch and decode the catalog, then commit it.
    ///
    /// On failure an empty snapshot is committed in place of the previous
    /// contents and the error is returned.
    pub async fn load(&self) -> Result<LoadReport, CatalogError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let origin = self.source.describe();
        debug!(ticket, source = %origin, "loading catalog");

        let fetched = self.fetch_snapshot(ticket, &origin).await;
        match fetched {
            Ok((snapshot, skipped_records)) => {
                let snapshot = Arc::new(snapshot);
                let committed = self.commit(snapshot.clone());
                if committed {
                    info!(
                        ticket,
                        tools = snapshot.len(),
                        skipped = skipped_records,
                        version = snapshot.version().as_str(),
                        "catalog committed"
                    );
                }
                Ok(LoadReport {
                    snapshot,
                    committed,
                    skipped_records,
                })
            }
            Err(err) => {
                error!(ticket, source = %origin, error = %err, "catalog source unavailable");
                let empty = Arc::new(CatalogSnapshot::failed(ticket, origin, err.to_string()));
                self.commit(empty);
                Err(CatalogError::SourceUnavailable(err))
            }
        }
    }

    /// Same as [`CatalogStore::load`]; kept separate for call-site clarity.
    pub async fn reload(&self) -> Result<LoadReport, CatalogError> {
        info!(source = %self.source.describe(), "reloading catalog");
        self.load().await
    }

    async fn fetch_snapshot(
        &self,
        ticket: u64,
        origin: &str,
    ) -> Result<(CatalogSnapshot, usize), SourceError> {
        let raw = self.source.fetch().await?;
        let version = CatalogVersion::from_content(&raw.bytes);
        let decoded = decode_catalog(&raw)?;
        let snapshot = CatalogSnapshot::new(ticket, version, origin, decoded.records);
        Ok((snapshot, decoded.skipped))
    }

    fn commit(&self, snapshot: Arc<CatalogSnapshot>) -> bool {
        let generation = snapshot.generation();
        let committed = self.current.send_if_modified(|current| {
            if generation > current.generation() {
                *current = snapshot;
                true
            } else {
                false
            }
        });
        if !committed {
            warn!(generation, "discarding stale catalog load");
        }
        committed
    }
}
