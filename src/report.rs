use crate::allocation::{ResourceAllocation, ResourceType};
use crate::calculations::AllocationConflict;
use crate::config::SchedulingConfig;
use crate::grouping::{ResourceGroup, ResourceGroups};
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReport {
    pub key: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    pub utilization_percent: f64,
    pub total_hours: f64,
    pub active_allocations: usize,
    pub conflicts: Vec<AllocationConflict>,
}

impl ResourceReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Utilization and conflicts for every resource in one allocation snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub resources: Vec<ResourceReport>,
}

impl ScheduleReport {
    pub fn build(allocations: &[ResourceAllocation], config: &SchedulingConfig) -> Self {
        let groups = ResourceGroups::from_allocations(allocations, None);
        Self::from_groups(&groups, config)
    }

    pub fn from_groups(groups: &ResourceGroups, config: &SchedulingConfig) -> Self {
        let resources: Vec<ResourceReport> = groups
            .as_slice()
            .par_iter()
            .map(|group| Self::report_for_group(group, config))
            .collect();
        tracing::debug!(resources = resources.len(), "recomputed schedule report");
        Self { resources }
    }

    fn report_for_group(group: &ResourceGroup, config: &SchedulingConfig) -> ResourceReport {
        let utilization = config.utilization_calculator().calculate(&group.allocations);
        let conflicts = config.conflict_detector().detect(&group.allocations);
        ResourceReport {
            key: group.key.clone(),
            resource_id: group.resource_id.clone(),
            resource_name: group.resource_name.clone(),
            resource_type: group.resource_type,
            utilization_percent: utilization.percent,
            total_hours: utilization.total_hours,
            active_allocations: utilization.active_allocations,
            conflicts,
        }
    }

    pub fn resource(&self, key: &str) -> Option<&ResourceReport> {
        self.resources.iter().find(|report| report.key == key)
    }

    pub fn conflict_count(&self) -> usize {
        self.resources.iter().map(|report| report.conflicts.len()).sum()
    }

    pub fn overbooked(&self) -> impl Iterator<Item = &ResourceReport> {
        self.resources.iter().filter(|report| report.has_conflicts())
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("resources={}", self.resources.len()));
        parts.push(format!("conflicts={}", self.conflict_count()));
        let overbooked = self
            .overbooked()
            .map(|report| report.key.as_str())
            .collect::<Vec<_>>();
        if !overbooked.is_empty() {
            parts.push(format!("overbooked={}", overbooked.join(",")));
        }
        parts.join(", ")
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let keys: Vec<&str> = self.resources.iter().map(|r| r.key.as_str()).collect();
        let names: Vec<&str> = self
            .resources
            .iter()
            .map(|r| r.resource_name.as_str())
            .collect();
        let types: Vec<&str> = self
            .resources
            .iter()
            .map(|r| r.resource_type.as_str())
            .collect();
        let active: Vec<i64> = self
            .resources
            .iter()
            .map(|r| r.active_allocations as i64)
            .collect();
        let hours: Vec<f64> = self.resources.iter().map(|r| r.total_hours).collect();
        let utilization: Vec<f64> = self
            .resources
            .iter()
            .map(|r| r.utilization_percent)
            .collect();
        let conflicts: Vec<i64> = self
            .resources
            .iter()
            .map(|r| r.conflicts.len() as i64)
            .collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("resource"), keys).into_column(),
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            Series::new(PlSmallStr::from_static("type"), types).into_column(),
            Series::new(PlSmallStr::from_static("active"), active).into_column(),
            Series::new(PlSmallStr::from_static("total_hours"), hours).into_column(),
            Series::new(PlSmallStr::from_static("utilization_pct"), utilization).into_column(),
            Series::new(PlSmallStr::from_static("conflicts"), conflicts).into_column(),
        ])
    }
}

/// Tabular view of raw allocations, one row per allocation.
pub fn allocations_dataframe(allocations: &[ResourceAllocation]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = allocations.iter().map(|a| a.id.as_str()).collect();
    let resources: Vec<String> = allocations.iter().map(|a| a.resource_key()).collect();
    let resources: Vec<&str> = resources.iter().map(String::as_str).collect();
    let projects: Vec<&str> = allocations.iter().map(|a| a.project_id.as_str()).collect();
    let starts: Vec<Option<i32>> = allocations
        .iter()
        .map(|a| a.allocation_start.map(date_to_i32))
        .collect();
    let ends: Vec<Option<i32>> = allocations
        .iter()
        .map(|a| a.allocation_end.map(date_to_i32))
        .collect();
    let hours: Vec<Option<f64>> = allocations.iter().map(|a| a.hours_per_day).collect();
    let quantity: Vec<Option<f64>> = allocations.iter().map(|a| a.quantity_allocated).collect();
    let status: Vec<&str> = allocations.iter().map(|a| a.status.as_str()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("resource"), resources).into_column(),
        Series::new(PlSmallStr::from_static("project"), projects).into_column(),
        Series::new(PlSmallStr::from_static("start"), starts)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("end"), ends)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("hours_per_day"), hours).into_column(),
        Series::new(PlSmallStr::from_static("quantity"), quantity).into_column(),
        Series::new(PlSmallStr::from_static("status"), status).into_column(),
    ])
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}
