use serde::{Deserialize, Serialize};

/// A single company in the directory.
///
/// Records are loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub industry: String,
    /// `"<City>, <Country>"`.
    pub location: String,
    pub employees: u64,
    pub founded: i32,
    /// Display string such as `"$4.2B"`. Not numeric.
    pub revenue: String,
    pub ceo: String,
}

impl Company {
    /// The substring after the last `", "` of the location, or the whole
    /// location if it has no separator.
    pub fn country_token(&self) -> &str {
        country_token(&self.location)
    }
}

pub fn country_token(location: &str) -> &str {
    match location.rfind(", ") {
        Some(idx) => &location[idx + 2..],
        None => location,
    }
}
