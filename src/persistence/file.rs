use super::{PersistenceError, PersistenceResult};
use crate::allocation::{AllocationStatus, ResourceAllocation, ResourceType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

#[derive(Serialize, Deserialize)]
struct AllocationSnapshot {
    allocations: Vec<ResourceAllocation>,
}

pub fn save_allocations_to_json<P: AsRef<Path>>(
    allocations: &[ResourceAllocation],
    path: P,
) -> PersistenceResult<()> {
    super::validate_allocations(allocations)?;
    let snapshot = AllocationSnapshot {
        allocations: allocations.to_vec(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_allocations_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<ResourceAllocation>> {
    let file = File::open(path)?;
    let snapshot: AllocationSnapshot = serde_json::from_reader(file)?;
    super::validate_allocations(&snapshot.allocations)?;
    Ok(snapshot.allocations)
}

#[derive(Default, Serialize, Deserialize)]
struct AllocationCsvRecord {
    id: String,
    resource_id: String,
    resource_name: String,
    resource_type: String,
    project_id: String,
    project_name: String,
    allocation_start: String,
    allocation_end: String,
    hours_per_day: String,
    quantity_allocated: String,
    status: String,
    #[serde(default)]
    notes: String,
}

impl From<&ResourceAllocation> for AllocationCsvRecord {
    fn from(allocation: &ResourceAllocation) -> Self {
        Self {
            id: allocation.id.clone(),
            resource_id: allocation.resource_id.clone(),
            resource_name: allocation.resource_name.clone(),
            resource_type: allocation.resource_type.as_str().to_string(),
            project_id: allocation.project_id.clone(),
            project_name: allocation.project_name.clone(),
            allocation_start: format_date(allocation.allocation_start),
            allocation_end: format_date(allocation.allocation_end),
            hours_per_day: format_option_f64(allocation.hours_per_day),
            quantity_allocated: format_option_f64(allocation.quantity_allocated),
            status: allocation.status.as_str().to_string(),
            notes: allocation.notes.clone().unwrap_or_default(),
        }
    }
}

impl AllocationCsvRecord {
    fn into_allocation(self) -> PersistenceResult<ResourceAllocation> {
        let resource_type = ResourceType::from_str(&self.resource_type)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        let status = if self.status.trim().is_empty() {
            AllocationStatus::default()
        } else {
            AllocationStatus::from_str(&self.status)
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?
        };
        Ok(ResourceAllocation {
            id: self.id,
            resource_id: self.resource_id,
            resource_name: self.resource_name,
            resource_type,
            project_id: self.project_id,
            project_name: self.project_name,
            allocation_start: parse_date(&self.allocation_start)?,
            allocation_end: parse_date(&self.allocation_end)?,
            hours_per_day: parse_f64(&self.hours_per_day)?,
            quantity_allocated: parse_f64(&self.quantity_allocated)?,
            status,
            notes: parse_string_option(self.notes),
        })
    }
}

pub fn save_allocations_to_csv<P: AsRef<Path>>(
    allocations: &[ResourceAllocation],
    path: P,
) -> PersistenceResult<()> {
    super::validate_allocations(allocations)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for allocation in allocations {
        writer.serialize(AllocationCsvRecord::from(allocation))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_allocations_from_csv<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<ResourceAllocation>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut allocations = Vec::new();
    for record in reader.deserialize::<AllocationCsvRecord>() {
        allocations.push(record?.into_allocation()?);
    }
    super::validate_allocations(&allocations)?;
    Ok(allocations)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid number '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
