// Series aggregation - Collapse prediction payloads into aligned rows
use crate::domain::prediction::{FlatAttritionRecord, PredictionPayload, SegmentedPrediction};
use crate::domain::series::{AlignedSeries, SeriesRow};
use std::collections::BTreeMap;

pub fn aggregate(payload: &PredictionPayload) -> AlignedSeries {
    match payload {
        PredictionPayload::Segmented(segments) => aggregate_segmented(segments),
        PredictionPayload::Flat(records) => aggregate_flat(records),
    }
}

/// Merge every segment into one row per distinct date.
///
/// Values reported by several segments for the same date are averaged
/// separately for the historical and predicted sides. Rows come out ordered
/// by date label.
pub fn aggregate_segmented(segments: &SegmentedPrediction) -> AlignedSeries {
    #[derive(Default)]
    struct DateGroup {
        historical: Vec<f64>,
        predicted: Vec<f64>,
    }

    let mut groups: BTreeMap<&str, DateGroup> = BTreeMap::new();

    for series in segments.values() {
        for record in &series.historical {
            groups
                .entry(record.date.as_str())
                .or_default()
                .historical
                .push(record.value);
        }
        for record in &series.predicted {
            groups
                .entry(record.date.as_str())
                .or_default()
                .predicted
                .push(record.value);
        }
    }

    let rows = groups
        .into_iter()
        .map(|(date, group)| SeriesRow::new(date, mean(&group.historical), mean(&group.predicted)))
        .collect();

    AlignedSeries::new(rows)
}

/// One row per attrition record; the rate goes in the actual column.
pub fn aggregate_flat(records: &[FlatAttritionRecord]) -> AlignedSeries {
    let rows = records
        .iter()
        .map(|r| SeriesRow::new(r.date.clone(), Some(r.attrition_rate), None))
        .collect();

    AlignedSeries::new(rows)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{PredictionRecord, SegmentSeries};
    use std::collections::HashSet;

    fn segment(historical: &[(&str, f64)], predicted: &[(&str, f64)]) -> SegmentSeries {
        SegmentSeries {
            historical: historical
                .iter()
                .map(|(d, v)| PredictionRecord::new(*d, *v))
                .collect(),
            predicted: predicted
                .iter()
                .map(|(d, v)| PredictionRecord::new(*d, *v))
                .collect(),
        }
    }

    #[test]
    fn test_two_teams_same_month_are_averaged() {
        let mut segments = SegmentedPrediction::new();
        segments.insert("TeamA".to_string(), segment(&[("2024-01", 5.0)], &[("2024-01", 6.0)]));
        segments.insert("TeamB".to_string(), segment(&[("2024-01", 7.0)], &[]));

        let series = aggregate_segmented(&segments);

        assert_eq!(series.rows, vec![SeriesRow::new("2024-01", Some(6.0), Some(6.0))]);
    }

    #[test]
    fn test_every_date_appears_once() {
        let mut segments = SegmentedPrediction::new();
        segments.insert(
            "Ops".to_string(),
            segment(&[("2023-01", 1.0), ("2023-02", 2.0)], &[("2023-03", 3.0)]),
        );
        segments.insert(
            "Sales".to_string(),
            segment(&[("2023-02", 4.0)], &[("2023-03", 5.0), ("2023-04", 6.0)]),
        );
        segments.insert("Support".to_string(), segment(&[("2023-01", 9.0)], &[]));

        let series = aggregate_segmented(&segments);
        let labels = series.labels();
        let unique: HashSet<&String> = labels.iter().collect();

        assert_eq!(labels.len(), unique.len());
        assert_eq!(labels, vec!["2023-01", "2023-02", "2023-03", "2023-04"]);
    }

    #[test]
    fn test_mean_of_many_segments() {
        let mut segments = SegmentedPrediction::new();
        for (name, value) in [("A", 1.0), ("B", 2.0), ("C", 4.5)] {
            segments.insert(name.to_string(), segment(&[("2022-06", value)], &[]));
        }

        let series = aggregate_segmented(&segments);
        let actual = series.rows[0].actual.unwrap();

        assert!((actual - 2.5).abs() < 1e-9);
        assert_eq!(series.rows[0].predicted, None);
    }

    #[test]
    fn test_predicted_only_date_has_no_actual() {
        let mut segments = SegmentedPrediction::new();
        segments.insert(
            "TeamA".to_string(),
            segment(&[("2024-01", 5.0)], &[("2024-02", 8.0)]),
        );

        let series = aggregate_segmented(&segments);

        assert_eq!(
            series.rows,
            vec![
                SeriesRow::new("2024-01", Some(5.0), None),
                SeriesRow::new("2024-02", None, Some(8.0)),
            ]
        );
    }

    #[test]
    fn test_zero_is_an_observation() {
        let mut segments = SegmentedPrediction::new();
        segments.insert("TeamA".to_string(), segment(&[("2024-01", 0.0)], &[]));

        let series = aggregate_segmented(&segments);
        assert_eq!(series.rows[0].actual, Some(0.0));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(aggregate(&PredictionPayload::Segmented(SegmentedPrediction::new())).is_empty());
        assert!(aggregate(&PredictionPayload::Flat(Vec::new())).is_empty());

        let mut segments = SegmentedPrediction::new();
        segments.insert("Idle".to_string(), SegmentSeries::default());
        assert!(aggregate_segmented(&segments).is_empty());
    }

    #[test]
    fn test_flat_keeps_input_order() {
        let records = vec![
            FlatAttritionRecord::new("2023-05", 10.0),
            FlatAttritionRecord::new("2022-01", 4.0),
        ];

        let series = aggregate(&PredictionPayload::Flat(records));

        assert_eq!(series.labels(), vec!["2023-05", "2022-01"]);
        assert_eq!(series.actual(), vec![Some(10.0), Some(4.0)]);
        assert_eq!(series.predicted(), vec![None, None]);
    }
}
