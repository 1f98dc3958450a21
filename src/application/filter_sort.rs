// Filter/sort stage - Year filtering and date ordering of series rows
use crate::domain::filter::{FilterState, SortOrder, YearMatch, compare_dates};
use crate::domain::series::SeriesRow;

/// Keep rows matching the active year, then order them by date.
///
/// The sort is stable, so rows with equal dates keep their input order.
/// The input slice is left untouched.
pub fn filter_and_sort(rows: &[SeriesRow], filter: &FilterState, rule: YearMatch) -> Vec<SeriesRow> {
    let mut selected = filter_by_year(rows, filter.active_year(), rule);
    sort_by_date(&mut selected, filter.order);
    selected
}

pub fn filter_by_year(rows: &[SeriesRow], year: Option<&str>, rule: YearMatch) -> Vec<SeriesRow> {
    match year {
        Some(year) => rows
            .iter()
            .filter(|r| rule.matches(&r.date, year))
            .cloned()
            .collect(),
        None => rows.to_vec(),
    }
}

pub fn sort_by_date(rows: &mut [SeriesRow], order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by(|a, b| compare_dates(&a.date, &b.date)),
        SortOrder::Descending => rows.sort_by(|a, b| compare_dates(&b.date, &a.date)),
    }
}
