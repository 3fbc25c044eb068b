use crate::allocation::{ResourceAllocation, ResourceType};
use std::collections::HashSet;
use thiserror::Error;

const MAX_HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn validate_allocation(allocation: &ResourceAllocation) -> Result<(), ValidationError> {
    if allocation.id.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "allocation for resource '{}' requires a non-empty id",
            allocation.resource_id
        )));
    }

    if allocation.resource_id.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "allocation {} requires a non-empty resource_id",
            allocation.id
        )));
    }

    let Some(start) = allocation.allocation_start else {
        return Err(ValidationError::new(format!(
            "allocation {} is missing a valid allocation_start",
            allocation.id
        )));
    };
    let Some(end) = allocation.allocation_end else {
        return Err(ValidationError::new(format!(
            "allocation {} is missing a valid allocation_end",
            allocation.id
        )));
    };
    if end < start {
        return Err(ValidationError::new(format!(
            "allocation {} ends {} before it starts {}",
            allocation.id, end, start
        )));
    }

    match allocation.resource_type {
        ResourceType::Employee => {
            if allocation.quantity_allocated.is_some() {
                return Err(ValidationError::new(format!(
                    "employee allocation {} cannot carry quantity_allocated",
                    allocation.id
                )));
            }
            if let Some(hours) = allocation.hours_per_day {
                if !hours.is_finite() || hours <= 0.0 || hours > MAX_HOURS_PER_DAY {
                    return Err(ValidationError::new(format!(
                        "allocation {} has invalid hours_per_day {} (must be in (0, 24])",
                        allocation.id, hours
                    )));
                }
            }
        }
        ResourceType::Equipment | ResourceType::Material => {
            if allocation.hours_per_day.is_some() {
                return Err(ValidationError::new(format!(
                    "{} allocation {} cannot carry hours_per_day",
                    allocation.resource_type, allocation.id
                )));
            }
            if let Some(quantity) = allocation.quantity_allocated {
                if !quantity.is_finite() || quantity < 0.0 {
                    return Err(ValidationError::new(format!(
                        "allocation {} has invalid quantity_allocated {}",
                        allocation.id, quantity
                    )));
                }
            }
        }
    }

    Ok(())
}

pub fn validate_allocation_collection(
    allocations: &[ResourceAllocation],
) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(allocations.len());
    for allocation in allocations {
        if !seen_ids.insert(allocation.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate allocation id {}",
                allocation.id
            )));
        }
        validate_allocation(allocation)?;
    }
    Ok(())
}
