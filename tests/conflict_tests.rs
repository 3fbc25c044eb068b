use chrono::NaiveDate;
use resource_schedule::{
    AllocationStatus, BoundaryPolicy, ConflictDetector, ConflictScan, ResourceAllocation,
    ResourceType,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn alloc(id: &str, start: NaiveDate, end: NaiveDate) -> ResourceAllocation {
    ResourceAllocation::new(id, "R1", ResourceType::Employee, start, end)
}

fn ids(conflicts: &[resource_schedule::AllocationConflict]) -> Vec<(String, String)> {
    conflicts
        .iter()
        .map(|c| (c.allocation1.id.clone(), c.allocation2.id.clone()))
        .collect()
}

#[test]
fn fewer_than_two_allocations_never_conflict() {
    let detector = ConflictDetector::default();
    assert!(detector.detect(&[]).is_empty());
    assert!(detector.detect(&[alloc("a", d(2025, 6, 1), d(2025, 6, 30))]).is_empty());
}

#[test]
fn disjoint_ranges_do_not_conflict() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 5)),
        alloc("b", d(2025, 6, 10), d(2025, 6, 15)),
    ];
    assert!(detector.detect(&allocations).is_empty());
}

#[test]
fn overlapping_ranges_yield_one_conflict() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("late", d(2025, 6, 5), d(2025, 6, 15)),
        alloc("early", d(2025, 6, 1), d(2025, 6, 10)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].allocation1.id, "early");
    assert_eq!(conflicts[0].allocation2.id, "late");
    assert_eq!(conflicts[0].overlap_range, (d(2025, 6, 5), d(2025, 6, 10)));
}

#[test]
fn third_allocation_after_the_overlap_adds_nothing() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 10)),
        alloc("b", d(2025, 6, 5), d(2025, 6, 12)),
        alloc("c", d(2025, 6, 20), d(2025, 6, 25)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(ids(&conflicts), vec![("a".to_string(), "b".to_string())]);
}

#[test]
fn shared_boundary_day_is_allowed_by_default() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 5)),
        alloc("b", d(2025, 6, 5), d(2025, 6, 8)),
    ];
    assert!(detector.detect(&allocations).is_empty());

    let strict =
        ConflictDetector::new(ConflictScan::AdjacentPairs, BoundaryPolicy::SharedDayConflicts);
    let conflicts = strict.detect(&allocations);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_range, (d(2025, 6, 5), d(2025, 6, 5)));
}

#[test]
fn adjacent_scan_misses_non_adjacent_overlap() {
    // a spans b and c; only neighbours in start order are compared.
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 10)),
        alloc("b", d(2025, 6, 2), d(2025, 6, 3)),
        alloc("c", d(2025, 6, 4), d(2025, 6, 5)),
    ];
    let adjacent = ConflictDetector::default().detect(&allocations);
    assert_eq!(ids(&adjacent), vec![("a".to_string(), "b".to_string())]);
    assert_eq!(adjacent[0].overlap_range, (d(2025, 6, 2), d(2025, 6, 10)));

    let all_pairs =
        ConflictDetector::new(ConflictScan::AllPairs, BoundaryPolicy::SharedDayAllowed)
            .detect(&allocations);
    assert_eq!(
        ids(&all_pairs),
        vec![
            ("a".to_string(), "b".to_string()),
            ("a".to_string(), "c".to_string()),
        ]
    );
    assert_eq!(all_pairs[0].overlap_range, (d(2025, 6, 2), d(2025, 6, 3)));
    assert_eq!(all_pairs[1].overlap_range, (d(2025, 6, 4), d(2025, 6, 5)));
}

#[test]
fn equal_starts_keep_input_order() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("first", d(2025, 6, 1), d(2025, 6, 10)),
        alloc("second", d(2025, 6, 1), d(2025, 6, 3)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(ids(&conflicts), vec![("first".to_string(), "second".to_string())]);
}

#[test]
fn cancelled_allocations_are_ignored() {
    let detector = ConflictDetector::default();
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 10)),
        alloc("b", d(2025, 6, 5), d(2025, 6, 12)).with_status(AllocationStatus::Cancelled),
    ];
    assert!(detector.detect(&allocations).is_empty());
}

#[test]
fn unparseable_dates_sort_last_without_aborting() {
    let detector = ConflictDetector::default();
    let mut broken = alloc("broken", d(2025, 6, 1), d(2025, 6, 30));
    broken.allocation_start = None;
    let allocations = vec![
        broken,
        alloc("a", d(2025, 6, 1), d(2025, 6, 10)),
        alloc("b", d(2025, 6, 5), d(2025, 6, 12)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(ids(&conflicts), vec![("a".to_string(), "b".to_string())]);
}

#[test]
fn missing_end_skips_only_that_pair() {
    let detector = ConflictDetector::default();
    let mut open_ended = alloc("open", d(2025, 6, 1), d(2025, 6, 30));
    open_ended.allocation_end = None;
    let allocations = vec![
        open_ended,
        alloc("a", d(2025, 6, 5), d(2025, 6, 10)),
        alloc("b", d(2025, 6, 8), d(2025, 6, 12)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(ids(&conflicts), vec![("a".to_string(), "b".to_string())]);

    // An open-ended row sorting between two dated rows must not hide their overlap.
    let mut open_ended = alloc("open", d(2025, 6, 2), d(2025, 6, 30));
    open_ended.allocation_end = None;
    let allocations = vec![
        alloc("a", d(2025, 6, 1), d(2025, 6, 10)),
        open_ended,
        alloc("c", d(2025, 6, 5), d(2025, 6, 8)),
    ];
    let conflicts = detector.detect(&allocations);
    assert_eq!(ids(&conflicts), vec![("a".to_string(), "c".to_string())]);
    assert_eq!(conflicts[0].overlap_range, (d(2025, 6, 5), d(2025, 6, 10)));
}
