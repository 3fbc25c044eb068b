pub mod allocation;
pub mod allocation_validation;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod grouping;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod pipeline;
pub mod report;

pub use allocation::{
    AllocationStatus, NewAllocation, ResourceAllocation, ResourceType, parse_allocation_date,
};
pub use allocation_validation::{
    ValidationError, validate_allocation, validate_allocation_collection,
};
pub use calculations::{
    AllocationConflict, BoundaryPolicy, ConflictDetector, ConflictScan, DEFAULT_AVAILABLE_HOURS,
    Utilization, UtilizationCalculator,
};
pub use calendar::{WeekNavigator, WeekStep, WeekWindow};
pub use config::{ConfigError, SchedulingConfig};
pub use grouping::{ResourceGroup, ResourceGroups, group_by_resource, resource_key};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteAllocationStore;
pub use persistence::{
    AllocationQuery, AllocationStore, InMemoryAllocationStore, PersistenceError, StoreError,
    StoreEvent, load_allocations_from_csv, load_allocations_from_json, save_allocations_to_csv,
    save_allocations_to_json, validate_allocations,
};
pub use pipeline::SnapshotPipeline;
pub use report::{ResourceReport, ScheduleReport, allocations_dataframe};
