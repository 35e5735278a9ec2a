//! The list-query engine.
//!
//! [`evaluate`] is a pure function of the store and a descriptor. The steps
//! run in a fixed order: search, industry, location, sort, paginate.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::query::{QueryDescriptor, SortKey, SortOrder, SortValue};
use crate::store::RecordStore;

/// Pagination metadata, always derived from the filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_companies: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(current_page: u64, limit: u64, total_companies: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_companies.div_ceil(limit)
        };
        Self {
            current_page,
            total_pages,
            total_companies,
            limit,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// 1-based inclusive range of items shown on the current page, as in
    /// "Showing 11 - 20 of 42". `None` when the page holds nothing.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.current_page == 0 || self.limit == 0 {
            return None;
        }
        let start = (self.current_page - 1).saturating_mul(self.limit) + 1;
        let end = self
            .current_page
            .saturating_mul(self.limit)
            .min(self.total_companies);
        (start <= end).then_some((start, end))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::query::DEFAULT_LIMIT.get(), 0)
    }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPage {
    pub data: Vec<Company>,
    pub pagination: Pagination,
}

/// Run a query against the store.
///
/// The returned records are independent copies.
pub fn evaluate(store: &RecordStore, query: &QueryDescriptor) -> CompanyPage {
    let mut matched = filter(store.records(), query);
    sort(&mut matched, query.sort_by, query.sort_order);

    let total = matched.len() as u64;
    let limit = query.limit.get();
    let data = page_slice(&matched, query.page, limit)
        .iter()
        .map(|c| (*c).clone())
        .collect();

    CompanyPage {
        data,
        pagination: Pagination::new(query.page, limit, total),
    }
}

/// Apply the search, industry and location filters, preserving store order.
pub fn filter<'a>(records: &'a [Company], query: &QueryDescriptor) -> Vec<&'a Company> {
    let search = query.search.to_lowercase();
    let industry = query.industry_filter();
    let location = query.location_filter();

    records
        .iter()
        .filter(|c| search.is_empty() || matches_search(c, &search))
        .filter(|c| industry.map_or(true, |i| c.industry == i))
        .filter(|c| location.map_or(true, |l| c.location.contains(l)))
        .collect()
}

/// `needle` must already be lowercase.
fn matches_search(company: &Company, needle: &str) -> bool {
    company.name.to_lowercase().contains(needle)
        || company.description.to_lowercase().contains(needle)
        || company.location.to_lowercase().contains(needle)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NormalizedKey {
    Number(i128),
    Text(String),
}

fn normalized_key(key: SortKey, company: &Company) -> NormalizedKey {
    match key.value_of(company) {
        SortValue::Number(n) => NormalizedKey::Number(n),
        SortValue::Text(s) => NormalizedKey::Text(s.to_lowercase()),
    }
}

/// Stable sort. Descending order reverses the comparison, so equal keys keep
/// their original relative order in both directions.
pub fn sort(records: &mut Vec<&Company>, key: SortKey, order: SortOrder) {
    let mut keyed: Vec<(NormalizedKey, &Company)> = records
        .iter()
        .map(|c| (normalized_key(key, c), *c))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord: Ordering = a.cmp(b);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    records.clear();
    records.extend(keyed.into_iter().map(|(_, c)| c));
}

fn page_slice<'s, T>(items: &'s [T], page: u64, limit: u64) -> &'s [T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(limit);
    let Ok(start) = usize::try_from(start) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(items.len());
    &items[start..end]
}
