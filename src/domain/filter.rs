// Filter state and date ordering
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Arrow shown on the sort button.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// Year filter and sort direction shared by both chart pipelines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub year_filter: Option<String>,
    pub order: SortOrder,
}

impl FilterState {
    pub fn new(year_filter: Option<String>, order: SortOrder) -> Self {
        Self { year_filter, order }
    }

    /// The year to filter on, ignoring blank values.
    pub fn active_year(&self) -> Option<&str> {
        self.year_filter
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
    }
}

/// How a year filter is matched against a date label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMatch {
    Prefix,
    Contains,
}

impl YearMatch {
    pub fn matches(&self, date: &str, year: &str) -> bool {
        match self {
            YearMatch::Prefix => date.starts_with(year),
            YearMatch::Contains => date.contains(year),
        }
    }
}

/// Parse the date representations the prediction API emits.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    // Month precision, e.g. "2024-01"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    // Year precision
    if value.len() == 4 {
        if let Ok(year) = value.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        }
    }

    None
}

/// Ascending comparison of two date labels.
///
/// A label that does not parse compares greater than every valid date, and
/// two unparseable labels compare equal.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
