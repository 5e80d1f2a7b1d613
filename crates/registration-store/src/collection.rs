//! In-memory registration collection.

use crate::types::{ClassCount, ClassName, RegistrationRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// All registration records, indexed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    records: HashMap<Uuid, RegistrationRecord>,
}

impl Collection {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Get a record by id.
    pub fn get(&self, id: &Uuid) -> Option<&RegistrationRecord> {
        self.records.get(id)
    }

    /// Insert a record, replacing any record with the same id.
    pub fn insert(&mut self, record: RegistrationRecord) {
        self.records.insert(record.id, record);
    }

    /// Remove a record.
    pub fn remove(&mut self, id: &Uuid) -> Option<RegistrationRecord> {
        self.records.remove(id)
    }

    /// All records, newest first.
    pub fn list_newest_first(&self) -> Vec<&RegistrationRecord> {
        let mut records: Vec<&RegistrationRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records submitted at or after `instant`.
    pub fn count_since(&self, instant: DateTime<Utc>) -> usize {
        self.records
            .values()
            .filter(|r| r.submitted_at >= instant)
            .count()
    }

    /// Record counts per class, largest first.
    ///
    /// Classes with no records are omitted. Equal counts keep class order.
    pub fn count_by_class(&self) -> Vec<ClassCount> {
        let mut counts: HashMap<ClassName, usize> = HashMap::new();
        for record in self.records.values() {
            *counts.entry(record.class_name).or_default() += 1;
        }

        let mut grouped: Vec<ClassCount> = counts
            .into_iter()
            .map(|(class_name, count)| ClassCount { class_name, count })
            .collect();
        grouped.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.class_name.cmp(&b.class_name))
        });
        grouped
    }
}
