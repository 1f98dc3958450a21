// Aligned series domain models
use serde::Serialize;

/// One date with its aggregated actual and predicted values.
///
/// `None` means the series had no observation for this date. It is never
/// a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: String,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

impl SeriesRow {
    pub fn new(date: impl Into<String>, actual: Option<f64>, predicted: Option<f64>) -> Self {
        Self {
            date: date.into(),
            actual,
            predicted,
        }
    }
}

/// Rows keyed by unique date, positionally aligned across both value columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub rows: Vec<SeriesRow>,
}

impl AlignedSeries {
    pub fn new(rows: Vec<SeriesRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.date.clone()).collect()
    }

    pub fn actual(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.actual).collect()
    }

    pub fn predicted(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.predicted).collect()
    }
}
