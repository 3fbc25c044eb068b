use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of resource that can be allocated to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Employee,
    Equipment,
    Material,
}

/// Lifecycle state of an allocation. Allocations are soft-cancelled, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Employee,
        ResourceType::Equipment,
        ResourceType::Material,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Employee => "employee",
            ResourceType::Equipment => "equipment",
            ResourceType::Material => "material",
        }
    }

    /// Employees are measured in hours per day, everything else in quantity.
    pub fn uses_hours(&self) -> bool {
        matches!(self, ResourceType::Employee)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(ResourceType::Employee),
            "equipment" => Ok(ResourceType::Equipment),
            "material" => Ok(ResourceType::Material),
            _ => Err(UnknownVariant {
                kind: "resource type",
                value: s.to_string(),
            }),
        }
    }
}

impl AllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Scheduled => "scheduled",
            AllocationStatus::InProgress => "in_progress",
            AllocationStatus::Completed => "completed",
            AllocationStatus::Cancelled => "cancelled",
        }
    }

    /// Scheduled and in-progress allocations still occupy the resource.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AllocationStatus::Scheduled | AllocationStatus::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AllocationStatus::Completed | AllocationStatus::Cancelled
        )
    }

    /// `scheduled -> in_progress -> completed`, and any active state may be cancelled.
    pub fn can_transition_to(&self, next: AllocationStatus) -> bool {
        use AllocationStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Scheduled, InProgress) => true,
            (InProgress, Completed) => true,
            (Scheduled | InProgress, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(AllocationStatus::Scheduled),
            "in_progress" => Ok(AllocationStatus::InProgress),
            "completed" => Ok(AllocationStatus::Completed),
            "cancelled" => Ok(AllocationStatus::Cancelled),
            _ => Err(UnknownVariant {
                kind: "allocation status",
                value: s.to_string(),
            }),
        }
    }
}

/// One assignment of a resource to a project over an inclusive date range.
///
/// Dates are optional so that rows with unparseable dates coming from the
/// backing store can still be carried through the calculations; see
/// [`parse_allocation_date`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub id: String,
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default, with = "lenient_date")]
    pub allocation_start: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub allocation_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_allocated: Option<f64>,
    #[serde(default)]
    pub status: AllocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ResourceAllocation {
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        resource_type: ResourceType,
        allocation_start: NaiveDate,
        allocation_end: NaiveDate,
    ) -> Self {
        let resource_id = resource_id.into();
        Self {
            id: id.into(),
            resource_name: resource_id.clone(),
            resource_id,
            resource_type,
            project_id: String::new(),
            project_name: String::new(),
            allocation_start: Some(allocation_start),
            allocation_end: Some(allocation_end),
            hours_per_day: None,
            quantity_allocated: None,
            status: AllocationStatus::Scheduled,
            notes: None,
        }
    }

    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = name.into();
        self
    }

    pub fn with_project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.project_id = id.into();
        self.project_name = name.into();
        self
    }

    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = Some(hours);
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity_allocated = Some(quantity);
        self
    }

    pub fn with_status(mut self, status: AllocationStatus) -> Self {
        self.status = status;
        self
    }

    /// Both dates, when both parsed.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.allocation_start?, self.allocation_end?))
    }

    /// Inclusive number of days covered. Missing dates or an inverted range yield 0.
    pub fn day_count(&self) -> i64 {
        match self.date_range() {
            Some((start, end)) if end >= start => (end - start).num_days() + 1,
            _ => 0,
        }
    }

    /// True when the allocation shares at least one day with `[from, to]`.
    pub fn overlaps_window(&self, from: NaiveDate, to: NaiveDate) -> bool {
        match self.date_range() {
            Some((start, end)) => start <= to && end >= from,
            None => false,
        }
    }

    pub fn resource_key(&self) -> String {
        crate::grouping::resource_key(self.resource_type, &self.resource_id)
    }
}

/// Payload for creating an allocation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAllocation {
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub allocation_start: NaiveDate,
    pub allocation_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_allocated: Option<f64>,
    #[serde(default)]
    pub status: AllocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAllocation {
    pub fn new(
        resource_id: impl Into<String>,
        resource_type: ResourceType,
        project_id: impl Into<String>,
        allocation_start: NaiveDate,
        allocation_end: NaiveDate,
    ) -> Self {
        let resource_id = resource_id.into();
        let project_id = project_id.into();
        Self {
            resource_name: resource_id.clone(),
            resource_id,
            resource_type,
            project_name: project_id.clone(),
            project_id,
            allocation_start,
            allocation_end,
            hours_per_day: None,
            quantity_allocated: None,
            status: AllocationStatus::Scheduled,
            notes: None,
        }
    }

    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = Some(hours);
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity_allocated = Some(quantity);
        self
    }

    pub fn into_allocation(self, id: impl Into<String>) -> ResourceAllocation {
        let resource_name = if self.resource_name.trim().is_empty() {
            self.resource_id.clone()
        } else {
            self.resource_name
        };
        ResourceAllocation {
            id: id.into(),
            resource_id: self.resource_id,
            resource_name,
            resource_type: self.resource_type,
            project_id: self.project_id,
            project_name: self.project_name,
            allocation_start: Some(self.allocation_start),
            allocation_end: Some(self.allocation_end),
            hours_per_day: self.hours_per_day,
            quantity_allocated: self.quantity_allocated,
            status: self.status,
            notes: self.notes,
        }
    }
}

/// Parses a calendar date as the backing store hands it over.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps (the date part is kept). Anything else yields `None`.
pub fn parse_allocation_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.date());
    }
    tracing::warn!(value = trimmed, "unparseable allocation date, treating as missing");
    None
}

mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_allocation_date))
    }
}
