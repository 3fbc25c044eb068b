use crate::allocation::{ResourceAllocation, ResourceType};
use serde::Serialize;
use std::collections::HashMap;

/// Composite key identifying one resource across allocation rows.
pub fn resource_key(resource_type: ResourceType, resource_id: &str) -> String {
    format!("{}:{}", resource_type.as_str(), resource_id)
}

/// All allocations sharing one `(resource_type, resource_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroup {
    pub key: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    pub allocations: Vec<ResourceAllocation>,
}

/// Allocations partitioned by resource.
///
/// Groups iterate in first-seen order and each group keeps its allocations in
/// input order.
#[derive(Debug, Clone, Default)]
pub struct ResourceGroups {
    groups: Vec<ResourceGroup>,
    index: HashMap<String, usize>,
}

impl ResourceGroups {
    pub fn from_allocations(
        allocations: &[ResourceAllocation],
        resource_type: Option<ResourceType>,
    ) -> Self {
        let mut grouped = Self::default();
        for allocation in allocations {
            if resource_type.is_some_and(|wanted| wanted != allocation.resource_type) {
                continue;
            }
            grouped.push(allocation.clone());
        }
        grouped
    }

    fn push(&mut self, allocation: ResourceAllocation) {
        let key = allocation.resource_key();
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].allocations.push(allocation),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(ResourceGroup {
                    key,
                    resource_id: allocation.resource_id.clone(),
                    resource_name: allocation.resource_name.clone(),
                    resource_type: allocation.resource_type,
                    allocations: vec![allocation],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ResourceGroup> {
        self.index.get(key).map(|&idx| &self.groups[idx])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceGroup> {
        self.groups.iter()
    }

    pub fn as_slice(&self) -> &[ResourceGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<ResourceGroup> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a ResourceGroups {
    type Item = &'a ResourceGroup;
    type IntoIter = std::slice::Iter<'a, ResourceGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

pub fn group_by_resource(
    allocations: &[ResourceAllocation],
    resource_type: Option<ResourceType>,
) -> ResourceGroups {
    ResourceGroups::from_allocations(allocations, resource_type)
}
