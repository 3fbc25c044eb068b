use crate::allocation::{AllocationStatus, ResourceAllocation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which allocation pairs are compared once a resource's allocations are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScan {
    /// Only chronologically adjacent allocations. Overlaps between
    /// non-adjacent allocations are not reported.
    #[default]
    AdjacentPairs,
    /// Every pair.
    AllPairs,
}

/// Whether an end date equal to the next start date counts as an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    #[default]
    SharedDayAllowed,
    SharedDayConflicts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConflict {
    pub allocation1: ResourceAllocation,
    pub allocation2: ResourceAllocation,
    /// Inclusive `[start, end]` of the overlapping days.
    pub overlap_range: (NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    scan: ConflictScan,
    boundary: BoundaryPolicy,
}

impl ConflictDetector {
    pub fn new(scan: ConflictScan, boundary: BoundaryPolicy) -> Self {
        Self { scan, boundary }
    }

    pub fn scan(&self) -> ConflictScan {
        self.scan
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Finds double bookings among the allocations of a single resource.
    ///
    /// Cancelled allocations are ignored. The remaining ones are stably sorted
    /// by start date. Allocations missing either date are placed after every
    /// dated one and never take part in a comparison.
    pub fn detect(&self, allocations: &[ResourceAllocation]) -> Vec<AllocationConflict> {
        let mut ordered: Vec<&ResourceAllocation> = allocations
            .iter()
            .filter(|allocation| allocation.status != AllocationStatus::Cancelled)
            .collect();
        if ordered.len() < 2 {
            return Vec::new();
        }

        for allocation in &ordered {
            if allocation.date_range().is_none() {
                tracing::warn!(
                    allocation_id = %allocation.id,
                    resource_id = %allocation.resource_id,
                    "allocation has missing or unparseable dates; excluded from overlap checks"
                );
            }
        }

        ordered.sort_by(|a, b| {
            a.date_range()
                .is_none()
                .cmp(&b.date_range().is_none())
                .then_with(|| compare_starts(a.allocation_start, b.allocation_start))
        });
        let dated = ordered
            .iter()
            .take_while(|allocation| allocation.date_range().is_some())
            .count();
        let ordered = &ordered[..dated];

        match self.scan {
            ConflictScan::AdjacentPairs => self.adjacent_conflicts(ordered),
            ConflictScan::AllPairs => self.pairwise_conflicts(ordered),
        }
    }

    fn adjacent_conflicts(&self, ordered: &[&ResourceAllocation]) -> Vec<AllocationConflict> {
        let mut conflicts = Vec::new();
        for pair in ordered.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let (Some(current_end), Some(next_start)) =
                (current.allocation_end, next.allocation_start)
            else {
                continue;
            };
            if self.overlaps(current_end, next_start) {
                conflicts.push(AllocationConflict {
                    allocation1: current.clone(),
                    allocation2: next.clone(),
                    overlap_range: (next_start, current_end),
                });
            }
        }
        conflicts
    }

    fn pairwise_conflicts(&self, ordered: &[&ResourceAllocation]) -> Vec<AllocationConflict> {
        let mut conflicts = Vec::new();
        for (idx, first) in ordered.iter().enumerate() {
            let Some((first_start, first_end)) = first.date_range() else {
                continue;
            };
            for second in &ordered[idx + 1..] {
                let Some((second_start, second_end)) = second.date_range() else {
                    continue;
                };
                let overlap_start = first_start.max(second_start);
                let overlap_end = first_end.min(second_end);
                if overlap_start <= overlap_end && self.overlaps(first_end, second_start) {
                    conflicts.push(AllocationConflict {
                        allocation1: (*first).clone(),
                        allocation2: (*second).clone(),
                        overlap_range: (overlap_start, overlap_end),
                    });
                }
            }
        }
        conflicts
    }

    fn overlaps(&self, earlier_end: NaiveDate, later_start: NaiveDate) -> bool {
        match self.boundary {
            BoundaryPolicy::SharedDayAllowed => earlier_end > later_start,
            BoundaryPolicy::SharedDayConflicts => earlier_end >= later_start,
        }
    }
}

fn compare_starts(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
