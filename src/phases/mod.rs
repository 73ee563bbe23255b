//! Implementation of the phases of an aggregation run.
//!
//! ## Overview
//!
//! A run replays an ordered slice of version folders onto a fresh
//! destination tree:
//! 1. Discovery - Enumerate the version folders under the versions root
//! 2. Range Selection - Cut the inclusive `from..=to` slice out of that list
//! 3. Classification - Sort each version's subfolders into categories
//! 4. Merging - Relocate each category's content into the destination tree
//! 5. Packaging - Zip the merged tree (run by the caller once merging is done)
//!
//! The orchestrator drives phases 1-4 for a single project. The source tree
//! is consumed by the merge, and a failed run is not rolled back.

use std::collections::BTreeMap;

use crate::category::Category;

pub mod discovery;
pub mod merge;
pub mod orchestrator;
pub mod package;
pub mod range;

pub use discovery::{CategorySubfolder, VersionFolder};
pub use orchestrator::{execute_aggregation, Aggregation, RunState};

/// Summary of what a run moved into the destination tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Names of the merged versions, in merge order.
    pub versions: Vec<String>,
    /// Relocated items per category. Applications and reports count
    /// folders, databases count files.
    pub relocated: BTreeMap<Category, usize>,
    /// Subfolders skipped as `Unknown`, as `<version>/<subfolder>`.
    pub skipped: Vec<String>,
    /// `(Unknown)` database unit directories created during the run.
    pub unknown_units: Vec<String>,
}

impl AggregationReport {
    /// Items relocated for `category`.
    pub fn relocated(&self, category: Category) -> usize {
        self.relocated.get(&category).copied().unwrap_or(0)
    }

    pub fn total_relocated(&self) -> usize {
        self.relocated.values().sum()
    }

    pub(crate) fn record(&mut self, category: Category, count: usize) {
        *self.relocated.entry(category).or_insert(0) += count;
    }

    pub(crate) fn record_unknown_unit(&mut self, bucket: &str) {
        if !self.unknown_units.iter().any(|u| u == bucket) {
            self.unknown_units.push(bucket.to_string());
        }
    }
}
