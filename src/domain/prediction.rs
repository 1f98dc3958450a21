// Prediction payload domain models
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which chart pipeline a payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Attrition,
    Shrinkage,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 2] = [PipelineKind::Attrition, PipelineKind::Shrinkage];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Attrition => "attrition",
            PipelineKind::Shrinkage => "shrinkage",
        }
    }

    /// Panel heading shown above the chart, whatever state it is in.
    pub fn heading(&self) -> &'static str {
        match self {
            PipelineKind::Attrition => "Attrition Prediction",
            PipelineKind::Shrinkage => "Shrinkage Dashboard Prediction",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "attrition" => Some(PipelineKind::Attrition),
            "shrinkage" => Some(PipelineKind::Shrinkage),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One historical or predicted observation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

#[cfg(test)]
impl PredictionRecord {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Historical and predicted observations reported by one segment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SegmentSeries {
    #[serde(rename = "Historical", default)]
    pub historical: Vec<PredictionRecord>,
    #[serde(rename = "Predictions", default)]
    pub predicted: Vec<PredictionRecord>,
}

/// Segment name -> series, as returned by the shrinkage endpoint.
pub type SegmentedPrediction = BTreeMap<String, SegmentSeries>;

/// One attrition observation per date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatAttritionRecord {
    pub date: String,
    #[serde(rename = "Attrition Rate")]
    pub attrition_rate: f64,
}

#[cfg(test)]
impl FlatAttritionRecord {
    pub fn new(date: impl Into<String>, attrition_rate: f64) -> Self {
        Self {
            date: date.into(),
            attrition_rate,
        }
    }
}

/// Decoded response of either prediction endpoint.
///
/// The variant is chosen by the pipeline that issued the request, so
/// aggregation never has to guess the shape at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionPayload {
    Segmented(SegmentedPrediction),
    Flat(Vec<FlatAttritionRecord>),
}

impl PredictionPayload {
    pub fn kind(&self) -> PipelineKind {
        match self {
            PredictionPayload::Segmented(_) => PipelineKind::Shrinkage,
            PredictionPayload::Flat(_) => PipelineKind::Attrition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_series_defaults_missing_sides() {
        let json = r#"{ "TeamA": { "Historical": [{ "Date": "2024-01", "Value": 5 }] } }"#;
        let parsed: SegmentedPrediction = serde_json::from_str(json).unwrap();

        let team = &parsed["TeamA"];
        assert_eq!(team.historical, vec![PredictionRecord::new("2024-01", 5.0)]);
        assert!(team.predicted.is_empty());
    }

    #[test]
    fn test_flat_record_wire_names() {
        let json = r#"{ "date": "2023-05", "Attrition Rate": 10.5 }"#;
        let record: FlatAttritionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, FlatAttritionRecord::new("2023-05", 10.5));
    }

    #[test]
    fn test_pipeline_kind_parse() {
        assert_eq!(PipelineKind::parse("Attrition"), Some(PipelineKind::Attrition));
        assert_eq!(PipelineKind::parse("shrinkage"), Some(PipelineKind::Shrinkage));
        assert_eq!(PipelineKind::parse("headcount"), None);
    }
}
