//! Filter vocabularies offered to the user.
//!
//! Locations are listed by country token, while the location filter matches
//! any substring of the full location. The two granularities differ on purpose.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::store::RecordStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Distinct industries, sorted.
    pub industries: Vec<String>,
    /// Distinct country tokens, sorted.
    pub locations: Vec<String>,
}

pub fn extract_facets(store: &RecordStore) -> Facets {
    let mut industries = BTreeSet::new();
    let mut locations = BTreeSet::new();

    for company in store.records() {
        industries.insert(company.industry.as_str());
        locations.insert(company.country_token());
    }

    Facets {
        industries: industries.into_iter().map(str::to_string).collect(),
        locations: locations.into_iter().map(str::to_string).collect(),
    }
}
