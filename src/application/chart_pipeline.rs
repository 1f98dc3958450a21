// Chart pipeline - Fetch, aggregate, filter/sort and present one chart
use crate::application::aggregator::aggregate;
use crate::application::filter_sort::filter_and_sort;
use crate::application::prediction_source::{PredictionError, PredictionSource};
use crate::application::presenter::present;
use crate::domain::chart::PanelState;
use crate::domain::filter::{FilterState, YearMatch};
use crate::domain::prediction::PipelineKind;
use crate::domain::series::AlignedSeries;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ChartPipeline {
    source: Arc<dyn PredictionSource>,
}

impl ChartPipeline {
    pub fn new(source: Arc<dyn PredictionSource>) -> Self {
        Self { source }
    }

    /// Fetch and shape the series for `kind` under `filter`.
    pub async fn build(
        &self,
        kind: PipelineKind,
        filter: &FilterState,
    ) -> Result<AlignedSeries, PredictionError> {
        let payload = self.source.fetch(kind).await?;
        if payload.kind() != kind {
            return Err(PredictionError::UnexpectedShape {
                endpoint: kind.to_string(),
                expected: match kind {
                    PipelineKind::Attrition => "flat attrition records",
                    PipelineKind::Shrinkage => "segmented predictions",
                },
            });
        }

        let series = aggregate(&payload);
        let rows = filter_and_sort(&series.rows, filter, year_rule(kind));
        Ok(AlignedSeries::new(rows))
    }

    /// Run the whole pipeline and fold any failure into the panel state.
    pub async fn run(&self, kind: PipelineKind, filter: &FilterState) -> PanelState {
        let started = Instant::now();

        let state = match self.build(kind, filter).await {
            Ok(series) if series.is_empty() => PanelState::no_data(),
            Ok(series) => {
                tracing::debug!("{} pipeline produced {} rows", kind, series.len());
                PanelState::Ready {
                    chart: present(kind, &series, filter),
                }
            }
            Err(e) => {
                tracing::warn!("{} pipeline failed: {}", kind, e);
                PanelState::Error {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                }
            }
        };

        tracing::debug!("{} pipeline finished in {:?}", kind, started.elapsed());
        state
    }
}

/// Attrition dates are matched on their prefix, shrinkage dates anywhere.
pub fn year_rule(kind: PipelineKind) -> YearMatch {
    match kind {
        PipelineKind::Attrition => YearMatch::Prefix,
        PipelineKind::Shrinkage => YearMatch::Contains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_source::FakeSource;
    use crate::domain::filter::SortOrder;
    use crate::domain::prediction::{
        FlatAttritionRecord, PredictionPayload, PredictionRecord, SegmentSeries, SegmentedPrediction,
    };

    fn shrinkage_scenario() -> PredictionPayload {
        let mut segments = SegmentedPrediction::new();
        segments.insert(
            "TeamA".to_string(),
            SegmentSeries {
                historical: vec![PredictionRecord::new("2024-01", 5.0)],
                predicted: vec![PredictionRecord::new("2024-01", 6.0)],
            },
        );
        segments.insert(
            "TeamB".to_string(),
            SegmentSeries {
                historical: vec![PredictionRecord::new("2024-01", 7.0)],
                predicted: vec![],
            },
        );
        PredictionPayload::Segmented(segments)
    }

    #[tokio::test]
    async fn test_shrinkage_scenario_end_to_end() {
        let source = FakeSource::new().with_reply(PipelineKind::Shrinkage, Ok(shrinkage_scenario()));
        let pipeline = ChartPipeline::new(Arc::new(source));

        let state = pipeline.run(PipelineKind::Shrinkage, &FilterState::default()).await;

        let chart = match state {
            PanelState::Ready { chart } => chart,
            other => panic!("expected a ready panel, got {:?}", other),
        };
        assert_eq!(chart.labels, vec!["2024-01"]);
        assert_eq!(chart.datasets[0].data, vec![Some(6.0)]);
        assert_eq!(chart.datasets[1].data, vec![Some(6.0)]);
    }

    #[tokio::test]
    async fn test_attrition_scenario_filters_year() {
        let records = vec![
            FlatAttritionRecord::new("2023-05", 10.0),
            FlatAttritionRecord::new("2022-01", 4.0),
        ];
        let source =
            FakeSource::new().with_reply(PipelineKind::Attrition, Ok(PredictionPayload::Flat(records)));
        let pipeline = ChartPipeline::new(Arc::new(source));
        let filter = FilterState::new(Some("2023".to_string()), SortOrder::Ascending);

        let series = pipeline.build(PipelineKind::Attrition, &filter).await.unwrap();

        assert_eq!(series.labels(), vec!["2023-05"]);
        assert_eq!(series.actual(), vec![Some(10.0)]);
    }

    #[tokio::test]
    async fn test_empty_payload_shows_no_data() {
        let pipeline = ChartPipeline::new(Arc::new(FakeSource::new()));

        for kind in PipelineKind::ALL {
            let state = pipeline.run(kind, &FilterState::default()).await;
            assert_eq!(state, PanelState::no_data());
        }
    }

    #[tokio::test]
    async fn test_filter_that_matches_nothing_shows_no_data() {
        let source = FakeSource::new().with_reply(PipelineKind::Shrinkage, Ok(shrinkage_scenario()));
        let pipeline = ChartPipeline::new(Arc::new(source));
        let filter = FilterState::new(Some("2015".to_string()), SortOrder::Ascending);

        let state = pipeline.run(PipelineKind::Shrinkage, &filter).await;
        assert_eq!(state, PanelState::no_data());
    }

    #[tokio::test]
    async fn test_error_becomes_error_panel() {
        let source = FakeSource::new().with_reply(
            PipelineKind::Attrition,
            Err(PredictionError::Upstream {
                endpoint: "get_attrition_data".to_string(),
                status: Some(500),
                message: "boom".to_string(),
            }),
        );
        let pipeline = ChartPipeline::new(Arc::new(source));

        let state = pipeline.run(PipelineKind::Attrition, &FilterState::default()).await;

        match state {
            PanelState::Error { kind, message } => {
                assert_eq!(kind, "upstream");
                assert!(message.contains("500"));
            }
            other => panic!("expected error panel, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mismatched_variant_is_rejected() {
        let source = FakeSource::new().with_reply(PipelineKind::Attrition, Ok(shrinkage_scenario()));
        let pipeline = ChartPipeline::new(Arc::new(source));

        let err = pipeline
            .build(PipelineKind::Attrition, &FilterState::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unexpectedShape");
    }
}
