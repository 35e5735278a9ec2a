use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::RecordStore;

/// Summary statistics over the whole store (never filtered).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_companies: u64,
    pub industries_count: u64,
    /// Mean employee count rounded half up. 0 for an empty store.
    pub avg_employees: u64,
}

pub fn compute_stats(store: &RecordStore) -> Stats {
    let records = store.records();
    let industries: HashSet<&str> = records.iter().map(|c| c.industry.as_str()).collect();
    let total = records.len() as u64;
    let sum: u128 = records.iter().map(|c| u128::from(c.employees)).sum();

    Stats {
        total_companies: total,
        industries_count: industries.len() as u64,
        avg_employees: rounded_mean(sum, total),
    }
}

/// `round(sum / count)` in integers, half up. An empty input averages to 0.
fn rounded_mean(sum: u128, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = u128::from(count);
    let mean = (2 * sum + count) / (2 * count);
    u64::try_from(mean).unwrap_or(u64::MAX)
}
