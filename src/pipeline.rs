use crate::config::SchedulingConfig;
use crate::persistence::{AllocationQuery, AllocationStore, StoreEvent, StoreResult};
use crate::report::ScheduleReport;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Recomputes a [`ScheduleReport`] whenever the backing store reports a change.
///
/// The store is refetched on every change and the report is rebuilt from the
/// fresh snapshot; nothing is updated incrementally.
pub struct SnapshotPipeline<S: AllocationStore + ?Sized> {
    store: Arc<S>,
    config: SchedulingConfig,
    query: AllocationQuery,
    events: Receiver<StoreEvent>,
}

impl<S: AllocationStore + ?Sized> SnapshotPipeline<S> {
    pub fn new(store: Arc<S>, config: SchedulingConfig, query: AllocationQuery) -> Self {
        let events = store.subscribe();
        Self {
            store,
            config,
            query,
            events,
        }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    pub fn query(&self) -> &AllocationQuery {
        &self.query
    }

    pub fn recompute(&self) -> StoreResult<ScheduleReport> {
        let snapshot = self.store.list_allocations(&self.query)?;
        tracing::debug!(allocations = snapshot.len(), "recomputing from fresh snapshot");
        Ok(ScheduleReport::build(&snapshot, &self.config))
    }

    /// Drains pending events; recomputes once if any arrived.
    pub fn poll(&self) -> StoreResult<Option<ScheduleReport>> {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(_) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if changed {
            self.recompute().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Blocks on store events and hands each recomputed report to `on_report`.
    ///
    /// The pipeline holds the store, so the event channel never disconnects and
    /// this only returns when a recompute fails.
    pub fn run<F>(&self, mut on_report: F) -> StoreResult<()>
    where
        F: FnMut(ScheduleReport),
    {
        while self.events.recv().is_ok() {
            while self.events.try_recv().is_ok() {}
            on_report(self.recompute()?);
        }
        Ok(())
    }
}
