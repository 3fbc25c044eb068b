use super::{
    AllocationQuery, AllocationStore, ChangeNotifier, StoreError, StoreEvent, StoreResult,
    apply_status_transition, new_allocation_id,
};
use crate::allocation::{AllocationStatus, NewAllocation, ResourceAllocation};
use crate::allocation_validation::{validate_allocation, validate_allocation_collection};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::mpsc::Receiver;

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Backend(value.to_string())
    }
}

pub struct SqliteAllocationStore {
    connection: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl SqliteAllocationStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            notifier: ChangeNotifier::default(),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS resource_allocations (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                resource_id TEXT NOT NULL,
                allocation_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_allocations_project
                ON resource_allocations (project_id);
            CREATE INDEX IF NOT EXISTS idx_allocations_resource
                ON resource_allocations (resource_id);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn insert(connection: &Connection, allocation: &ResourceAllocation) -> StoreResult<()> {
        let json = serde_json::to_string(allocation)?;
        connection.execute(
            "INSERT INTO resource_allocations (id, project_id, resource_id, allocation_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                allocation.id,
                allocation.project_id,
                allocation.resource_id,
                json
            ],
        )?;
        Ok(())
    }

    fn exists(connection: &Connection, id: &str) -> StoreResult<bool> {
        let found: Option<i64> = connection
            .query_row(
                "SELECT 1 FROM resource_allocations WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn fetch(connection: &Connection, id: &str) -> StoreResult<Option<ResourceAllocation>> {
        let json: Option<String> = connection
            .query_row(
                "SELECT allocation_json FROM resource_allocations WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl AllocationStore for SqliteAllocationStore {
    fn list_allocations(&self, query: &AllocationQuery) -> StoreResult<Vec<ResourceAllocation>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT allocation_json FROM resource_allocations
             WHERE (?1 IS NULL OR project_id = ?1)
               AND (?2 IS NULL OR resource_id = ?2)
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![query.project_id, query.resource_id], |row| {
            row.get::<_, String>(0)
        })?;

        let mut allocations = Vec::new();
        for json in rows {
            let allocation: ResourceAllocation = serde_json::from_str(&json?)?;
            if query.matches(&allocation) {
                allocations.push(allocation);
            }
        }
        Ok(allocations)
    }

    fn get_allocation(&self, id: &str) -> StoreResult<Option<ResourceAllocation>> {
        let conn = self.connection.lock();
        Self::fetch(&conn, id)
    }

    fn create_allocation(&self, allocation: NewAllocation) -> StoreResult<ResourceAllocation> {
        let allocation = allocation.into_allocation(new_allocation_id());
        validate_allocation(&allocation)?;
        {
            let conn = self.connection.lock();
            Self::insert(&conn, &allocation)?;
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
            let conn = self.connection.lock();
            let mut allocation =
                Self::fetch(&conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let from = apply_status_transition(&mut allocation, status)?;
            let json = serde_json::to_string(&allocation)?;
            conn.execute(
                "UPDATE resource_allocations SET allocation_json = ?1 WHERE id = ?2",
                params![json, id],
            )?;
            (allocation, from)
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
            let mut conn = self.connection.lock();
            let tx = conn.transaction()?;
            for allocation in &incoming {
                if Self::exists(&tx, &allocation.id)? {
                    return Err(StoreError::Duplicate(allocation.id.clone()));
                }
                Self::insert(&tx, allocation)?;
            }
            tx.commit()?;
        }
        tracing::info!(count, "allocations imported");
        self.notifier.notify(StoreEvent::Imported { count });
        Ok(count)
    }

    fn subscribe(&self) -> Receiver<StoreEvent> {
        self.notifier.subscribe()
    }
}
