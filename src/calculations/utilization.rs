use crate::allocation::{ResourceAllocation, ResourceType};
use serde::{Deserialize, Serialize};

/// 40 hours a week over a 4-week planning window.
pub const DEFAULT_AVAILABLE_HOURS: f64 = 40.0 * 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    /// Share of the horizon consumed, clamped to `[0, 100]`.
    pub percent: f64,
    pub total_hours: f64,
    /// Scheduled or in-progress allocations, regardless of resource type.
    pub active_allocations: usize,
}

pub struct UtilizationCalculator {
    available_hours: f64,
}

impl Default for UtilizationCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_AVAILABLE_HOURS)
    }
}

impl UtilizationCalculator {
    pub fn new(available_hours: f64) -> Self {
        Self { available_hours }
    }

    pub fn available_hours(&self) -> f64 {
        self.available_hours
    }

    /// Hours booked by employee allocations that carry `hours_per_day`.
    ///
    /// Each allocation is counted on its own, so days covered by two
    /// overlapping allocations contribute twice.
    pub fn allocated_hours(&self, allocations: &[ResourceAllocation]) -> f64 {
        allocations
            .iter()
            .filter(|allocation| allocation.resource_type == ResourceType::Employee)
            .filter_map(|allocation| {
                let hours = allocation.hours_per_day?;
                if !hours.is_finite() || hours <= 0.0 {
                    return None;
                }
                Some(allocation.day_count() as f64 * hours)
            })
            .sum()
    }

    pub fn percent(&self, allocations: &[ResourceAllocation]) -> f64 {
        self.calculate(allocations).percent
    }

    pub fn calculate(&self, allocations: &[ResourceAllocation]) -> Utilization {
        let total_hours = self.allocated_hours(allocations);
        let active_allocations = allocations
            .iter()
            .filter(|allocation| allocation.status.is_active())
            .count();

        let percent = if self.available_hours > 0.0 && self.available_hours.is_finite() {
            let raw = total_hours * 100.0 / self.available_hours;
            if raw.is_finite() { raw.clamp(0.0, 100.0) } else { 100.0 }
        } else {
            0.0
        };

        Utilization {
            percent,
            total_hours,
            active_allocations,
        }
    }
}
