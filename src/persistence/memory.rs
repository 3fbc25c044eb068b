use super::{
    AllocationQuery, AllocationStore, ChangeNotifier, StoreError, StoreEvent, StoreResult,
    apply_status_transition, new_allocation_id,
};
use crate::allocation::{AllocationStatus, NewAllocation, ResourceAllocation};
use crate::allocation_validation::{validate_allocation, validate_allocation_collection};
use parking_lot::RwLock;
use std::sync::mpsc::Receiver;

/// Process-local store; rows keep insertion order.
#[derive(Default)]
pub struct InMemoryAllocationStore {
    allocations: RwLock<Vec<ResourceAllocation>>,
    notifier: ChangeNotifier,
}

impl InMemoryAllocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allocations(allocations: Vec<ResourceAllocation>) -> StoreResult<Self> {
        validate_allocation_collection(&allocations)?;
        Ok(Self {
            allocations: RwLock::new(allocations),
            notifier: ChangeNotifier::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.allocations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.read().is_empty()
    }

    /// Drops every row; used when a snapshot is reloaded from disk.
    pub fn clear(&self) {
        self.allocations.write().clear();
    }
}

impl AllocationStore for InMemoryAllocationStore {
    fn list_allocations(&self, query: &AllocationQuery) -> StoreResult<Vec<ResourceAllocation>> {
        let allocations = self.allocations.read();
        Ok(allocations
            .iter()
            .filter(|allocation| query.matches(allocation))
            .cloned()
            .collect())
    }

    fn get_allocation(&self, id: &str) -> StoreResult<Option<ResourceAllocation>> {
        let allocations = self.allocations.read();
        Ok(allocations.iter().find(|a| a.id == id).cloned())
    }

    fn create_allocation(&self, allocation: NewAllocation) -> StoreResult<ResourceAllocation> {
        let allocation = allocation.into_allocation(new_allocation_id());
        validate_allocation(&allocation)?;
        {
            let mut allocations = self.allocations.write();
            allocations.push(allocation.clone());
        }
        tracing::info!(
            allocation_id = %allocation.id,
            resource = %allocation.resource_key(),
            project_id = %allocation.project_id,
            "allocation created"
        );
        self.notifier.notify(StoreEvent::Created {
            id: allocation.id.clone(),
        });
        Ok(allocation)
    }

    fn update_allocation_status(
        &self,
        id: &str,
        status: AllocationStatus,
    ) -> StoreResult<ResourceAllocation> {
        let (updated, from) = {
            let mut allocations = self.allocations.write();
            let allocation = allocations
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let from = apply_status_transition(allocation, status)?;
            (allocation.clone(), from)
        };
        if from != status {
            tracing::info!(allocation_id = id, %from, to = %status, "allocation status changed");
            self.notifier.notify(StoreEvent::StatusChanged {
                id: id.to_string(),
                from,
                to: status,
            });
        }
        Ok(updated)
    }

    fn import_allocations(&self, incoming: Vec<ResourceAllocation>) -> StoreResult<usize> {
        validate_allocation_collection(&incoming)?;
        let count = incoming.len();
        {
            let mut allocations = self.allocations.write();
            if let Some(dup) = incoming
                .iter()
                .find(|new| allocations.iter().any(|existing| existing.id == new.id))
            {
                return Err(StoreError::Duplicate(dup.id.clone()));
            }
            allocations.extend(incoming);
        }
        tracing::info!(count, "allocations imported");
        self.notifier.notify(StoreEvent::Imported { count });
        Ok(count)
    }

    fn subscribe(&self) -> Receiver<StoreEvent> {
        self.notifier.subscribe()
    }
}
