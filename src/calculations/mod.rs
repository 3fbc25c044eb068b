pub mod conflicts;
pub mod utilization;

pub use conflicts::{AllocationConflict, BoundaryPolicy, ConflictDetector, ConflictScan};
pub use utilization::{DEFAULT_AVAILABLE_HOURS, Utilization, UtilizationCalculator};
