use crate::allocation::{AllocationStatus, NewAllocation, ResourceAllocation, ResourceType};
use crate::allocation_validation::{self, ValidationError};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("allocation {0} not found")]
    NotFound(String),
    #[error("allocation {0} already exists")]
    Duplicate(String),
    #[error("allocation {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: AllocationStatus,
        to: AllocationStatus,
    },
    #[error("invalid allocation: {0}")]
    Invalid(#[from] ValidationError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Change notification emitted by a store after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    Created {
        id: String,
    },
    StatusChanged {
        id: String,
        from: AllocationStatus,
        to: AllocationStatus,
    },
    Imported {
        count: usize,
    },
}

/// Filters for listing allocations. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationQuery {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    /// Keep allocations overlapping `[from, to]`; either bound may be open.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl AllocationQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn for_resource(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            ..Self::default()
        }
    }

    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn within(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, allocation: &ResourceAllocation) -> bool {
        if let Some(project_id) = &self.project_id {
            if &allocation.project_id != project_id {
                return false;
            }
        }
        if let Some(resource_id) = &self.resource_id {
            if &allocation.resource_id != resource_id {
                return false;
            }
        }
        if let Some(resource_type) = self.resource_type {
            if allocation.resource_type != resource_type {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let from = self.from.unwrap_or(NaiveDate::MIN);
            let to = self.to.unwrap_or(NaiveDate::MAX);
            if !allocation.overlaps_window(from, to) {
                return false;
            }
        }
        true
    }
}

/// Backing store for allocation records.
pub trait AllocationStore: Send + Sync {
    fn list_allocations(&self, query: &AllocationQuery) -> StoreResult<Vec<ResourceAllocation>>;
    fn get_allocation(&self, id: &str) -> StoreResult<Option<ResourceAllocation>>;
    fn create_allocation(&self, allocation: NewAllocation) -> StoreResult<ResourceAllocation>;
    fn update_allocation_status(
        &self,
        id: &str,
        status: AllocationStatus,
    ) -> StoreResult<ResourceAllocation>;
    /// Inserts fully formed records, keeping their ids. Returns the number inserted.
    fn import_allocations(&self, allocations: Vec<ResourceAllocation>) -> StoreResult<usize>;
    /// Receives one event per successful mutation from now on.
    fn subscribe(&self) -> Receiver<StoreEvent>;
}

pub fn validate_allocations(allocations: &[ResourceAllocation]) -> PersistenceResult<()> {
    allocation_validation::validate_allocation_collection(allocations)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Fan-out of store events to every live subscriber.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl ChangeNotifier {
    pub(crate) fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub(crate) fn notify(&self, event: StoreEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

pub(crate) fn new_allocation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Moves `allocation` to `status`, returning the previous status.
pub(crate) fn apply_status_transition(
    allocation: &mut ResourceAllocation,
    status: AllocationStatus,
) -> StoreResult<AllocationStatus> {
    let from = allocation.status;
    if !from.can_transition_to(status) {
        return Err(StoreError::InvalidTransition {
            id: allocation.id.clone(),
            from,
            to: status,
        });
    }
    allocation.status = status;
    Ok(from)
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_allocations_from_csv, load_allocations_from_json, save_allocations_to_csv,
    save_allocations_to_json,
};
pub use memory::InMemoryAllocationStore;
