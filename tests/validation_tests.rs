use chrono::NaiveDate;
use resource_schedule::{
    ResourceAllocation, ResourceType, validate_allocation, validate_allocation_collection,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee(id: &str) -> ResourceAllocation {
    ResourceAllocation::new(id, "R1", ResourceType::Employee, d(2025, 6, 2), d(2025, 6, 6))
}

#[test]
fn single_day_allocation_is_valid() {
    let allocation =
        ResourceAllocation::new("a1", "R1", ResourceType::Employee, d(2025, 6, 2), d(2025, 6, 2))
            .with_hours_per_day(8.0);
    assert!(validate_allocation(&allocation).is_ok());
}

#[test]
fn rejects_inverted_range() {
    let allocation =
        ResourceAllocation::new("a1", "R1", ResourceType::Employee, d(2025, 6, 5), d(2025, 6, 1));
    let err = validate_allocation(&allocation).unwrap_err();
    assert!(err.message().contains("before it starts"));
}

#[test]
fn rejects_hours_outside_a_day() {
    assert!(validate_allocation(&employee("a1").with_hours_per_day(25.0)).is_err());
    assert!(validate_allocation(&employee("a1").with_hours_per_day(0.0)).is_err());
    assert!(validate_allocation(&employee("a1").with_hours_per_day(24.0)).is_ok());
}

#[test]
fn rejects_numeric_field_for_wrong_resource_type() {
    let equipment =
        ResourceAllocation::new("a1", "EX-1", ResourceType::Equipment, d(2025, 6, 1), d(2025, 6, 2))
            .with_hours_per_day(8.0);
    assert!(validate_allocation(&equipment).is_err());
    assert!(validate_allocation(&employee("a2").with_quantity(3.0)).is_err());
}

#[test]
fn quantity_must_be_non_negative() {
    let material =
        ResourceAllocation::new("a1", "M-9", ResourceType::Material, d(2025, 6, 1), d(2025, 6, 2));
    assert!(validate_allocation(&material.clone().with_quantity(0.0)).is_ok());
    assert!(validate_allocation(&material.with_quantity(-1.0)).is_err());
}

#[test]
fn rejects_missing_dates_and_blank_resource() {
    let mut missing = employee("a1");
    missing.allocation_end = None;
    assert!(validate_allocation(&missing).is_err());

    let mut blank = employee("a2");
    blank.resource_id = "  ".into();
    assert!(validate_allocation(&blank).is_err());
}

#[test]
fn collection_rejects_duplicate_ids() {
    let err = validate_allocation_collection(&[employee("a1"), employee("a1")]).unwrap_err();
    assert_eq!(err.message(), "duplicate allocation id a1");
}
