//! Query descriptors and the normalization of raw request parameters.
//!
//! A [`QueryDescriptor`] fully determines the engine output. Raw parameters
//! arrive as optional strings and are coerced to defaults where malformed;
//! only an unrecognized sort key is rejected outright.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::company::Company;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: NonZeroU64 = match NonZeroU64::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Page sizes offered by the UI. The engine accepts any positive limit.
pub const LIMIT_PRESETS: [u64; 4] = [5, 10, 20, 50];

/// Filter value meaning "no filter" for industry and location.
pub const ALL: &str = "all";

/// Errors raised when a query cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `sortBy` named a field that is not sortable.
    InvalidSortKey { value: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSortKey { value } => write!(
                f,
                "invalid sortBy '{}': expected one of {}",
                value,
                SortKey::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl std::error::Error for QueryError {}

/// Field a result set can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Employees,
    Founded,
    Industry,
    Description,
    Location,
    Ceo,
    Revenue,
}

/// Sort key projected out of a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Number(i128),
    Text(&'a str),
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Name,
        SortKey::Employees,
        SortKey::Founded,
        SortKey::Industry,
        SortKey::Description,
        SortKey::Location,
        SortKey::Ceo,
        SortKey::Revenue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Employees => "employees",
            Self::Founded => "founded",
            Self::Industry => "industry",
            Self::Description => "description",
            Self::Location => "location",
            Self::Ceo => "ceo",
            Self::Revenue => "revenue",
        }
    }

    /// True for keys compared numerically rather than as text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Employees | Self::Founded)
    }

    pub fn value_of<'a>(&self, company: &'a Company) -> SortValue<'a> {
        match self {
            Self::Name => SortValue::Text(&company.name),
            Self::Employees => SortValue::Number(i128::from(company.employees)),
            Self::Founded => SortValue::Number(i128::from(company.founded)),
            Self::Industry => SortValue::Text(&company.industry),
            Self::Description => SortValue::Text(&company.description),
            Self::Location => SortValue::Text(&company.location),
            Self::Ceo => SortValue::Text(&company.ceo),
            Self::Revenue => SortValue::Text(&company.revenue),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| QueryError::InvalidSortKey {
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Lenient parse: anything other than `desc` (any case) is ascending.
    pub fn parse_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters exactly as they arrive on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompanyQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl RawCompanyQuery {
    /// Collect parameters from decoded `key=value` pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "limit" => &mut raw.limit,
                "search" => &mut raw.search,
                "industry" => &mut raw.industry,
                "location" => &mut raw.location,
                "sortBy" => &mut raw.sort_by,
                "sortOrder" => &mut raw.sort_order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }
}

/// Fully normalized query. Determines the engine output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    /// 1-based. Page 0 is out of range and selects nothing.
    pub page: u64,
    pub limit: NonZeroU64,
    pub search: String,
    /// Exact industry, or empty / [`ALL`] for no filter.
    pub industry: String,
    /// Substring of the location, or empty / [`ALL`] for no filter.
    pub location: String,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            industry: String::new(),
            location: String::new(),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl QueryDescriptor {
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size. Zero falls back to the default.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = NonZeroU64::new(limit).unwrap_or(DEFAULT_LIMIT);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Normalize raw request parameters.
    ///
    /// Malformed pagination values fall back to defaults. An empty or missing
    /// `sortBy` means `name`; any other unknown key is an error.
    pub fn from_raw(raw: &RawCompanyQuery) -> Result<Self, QueryError> {
        let page = raw
            .page
            .as_deref()
            .and_then(parse_clamped)
            .unwrap_or(DEFAULT_PAGE);

        let limit = raw
            .limit
            .as_deref()
            .and_then(parse_clamped)
            .and_then(NonZeroU64::new)
            .unwrap_or(DEFAULT_LIMIT);

        let sort_by = match raw.sort_by.as_deref() {
            None | Some("") => SortKey::default(),
            Some(key) => key.parse()?,
        };

        let sort_order = raw
            .sort_order
            .as_deref()
            .map(SortOrder::parse_lenient)
            .unwrap_or_default();

        Ok(Self {
            page,
            limit,
            search: raw.search.clone().unwrap_or_default(),
            industry: raw.industry.clone().unwrap_or_default(),
            location: raw.location.clone().unwrap_or_default(),
            sort_by,
            sort_order,
        })
    }

    /// Wire form of this descriptor, suitable for a URL query string.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
            ("industry", self.industry.clone()),
            ("location", self.location.clone()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
        ]
    }

    pub fn industry_filter(&self) -> Option<&str> {
        active_filter(&self.industry)
    }

    pub fn location_filter(&self) -> Option<&str> {
        active_filter(&self.location)
    }
}

/// Parse a signed decimal integer into the `u64` range: negatives clamp to
/// 0 and values too large for `u64` saturate. `None` if it is not an integer.
fn parse_clamped(s: &str) -> Option<u64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

fn active_filter(value: &str) -> Option<&str> {
    if value.is_empty() || value == ALL {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawCompanyQuery {
        RawCompanyQuery::default()
    }

    #[test]
    fn test_missing_params_use_defaults() {
        let q = QueryDescriptor::from_raw(&raw()).unwrap();
        assert_eq!(q, QueryDescriptor::default());
        assert_eq!(q.page, 1);
        assert_eq!(q.limit.get(), 10);
        assert_eq!(q.sort_by, SortKey::Name);
        assert_eq!(q.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_non_numeric_page_is_one() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            page: Some("abc".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.page, 1);
    }

    #[test]
    fn test_negative_page_clamps_to_zero() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            page: Some("-3".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.page, 0);
    }

    #[test]
    fn test_oversized_page_saturates() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            page: Some("99999999999999999999".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.page, u64::MAX);

        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            page: Some("-99999999999999999999".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.page, 0);
    }

    #[test]
    fn test_oversized_limit_saturates() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            limit: Some("99999999999999999999".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.limit.get(), u64::MAX);
    }

    #[test]
    fn test_page_sign_and_whitespace() {
        for (text, expected) in [(" 4 ", 4), ("+2", 2), ("-0", 0), ("3abc", 1), ("-", 1)] {
            let q = QueryDescriptor::from_raw(&RawCompanyQuery {
                page: Some(text.to_string()),
                ..raw()
            })
            .unwrap();
            assert_eq!(q.page, expected, "page {:?}", text);
        }
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let raw = RawCompanyQuery::from_pairs([
            ("page", "1"),
            ("page", "2"),
            ("sortBy", "founded"),
            ("utm_source", "mail"),
            ("sortBy", "salary"),
        ]);
        assert_eq!(raw.page.as_deref(), Some("1"));
        assert_eq!(raw.sort_by.as_deref(), Some("founded"));
        assert_eq!(raw.limit, None);

        let q = QueryDescriptor::from_raw(&raw).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.sort_by, SortKey::Founded);
    }

    #[test]
    fn test_bad_limit_falls_back() {
        for bad in ["0", "-5", "ten", ""] {
            let q = QueryDescriptor::from_raw(&RawCompanyQuery {
                limit: Some(bad.to_string()),
                ..raw()
            })
            .unwrap();
            assert_eq!(q.limit, DEFAULT_LIMIT, "limit {:?}", bad);
        }
    }

    #[test]
    fn test_limit_outside_presets_accepted() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            limit: Some("7".to_string()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.limit.get(), 7);
        assert!(!LIMIT_PRESETS.contains(&7));
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        let err = QueryDescriptor::from_raw(&RawCompanyQuery {
            sort_by: Some("salary".to_string()),
            ..raw()
        })
        .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidSortKey {
                value: "salary".to_string()
            }
        );
        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn test_sort_key_is_case_sensitive() {
        assert!("Name".parse::<SortKey>().is_err());
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
    }

    #[test]
    fn test_empty_sort_key_defaults_to_name() {
        let q = QueryDescriptor::from_raw(&RawCompanyQuery {
            sort_by: Some(String::new()),
            ..raw()
        })
        .unwrap();
        assert_eq!(q.sort_by, SortKey::Name);
    }

    #[test]
    fn test_sort_order_is_lenient() {
        assert_eq!(SortOrder::parse_lenient("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient("sideways"), SortOrder::Asc);
    }

    #[test]
    fn test_all_sentinel_disables_filters() {
        let q = QueryDescriptor::default()
            .with_industry(ALL)
            .with_location("");
        assert_eq!(q.industry_filter(), None);
        assert_eq!(q.location_filter(), None);

        let q = q.with_industry("Technology").with_location("USA");
        assert_eq!(q.industry_filter(), Some("Technology"));
        assert_eq!(q.location_filter(), Some("USA"));
    }

    #[test]
    fn test_query_pairs_parse_back() {
        let q = QueryDescriptor::default()
            .with_page(3)
            .with_limit(20)
            .with_search("cloud")
            .with_sort(SortKey::Founded, SortOrder::Desc);

        let pairs = q.to_query_pairs();
        let get = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone())
        };
        let raw = RawCompanyQuery {
            page: get("page"),
            limit: get("limit"),
            search: get("search"),
            industry: get("industry"),
            location: get("location"),
            sort_by: get("sortBy"),
            sort_order: get("sortOrder"),
        };
        assert_eq!(QueryDescriptor::from_raw(&raw).unwrap(), q);
    }

    #[test]
    fn test_with_limit_zero_uses_default() {
        assert_eq!(QueryDescriptor::default().with_limit(0).limit, DEFAULT_LIMIT);
    }
}
