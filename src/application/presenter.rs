// Chart presenter - Fixed visual encoding for each pipeline
use crate::domain::chart::{AxisView, ChartView, Dataset};
use crate::domain::filter::FilterState;
use crate::domain::prediction::PipelineKind;
use crate::domain::series::AlignedSeries;

const ATTRITION_BAR_COLOR: &str = "rgba(173, 216, 230, 0.6)";
const TREND_LINE_COLOR: &str = "red";
const ACTUAL_COLOR: &str = "red";
const PREDICTED_COLOR: &str = "blue";

pub fn present(kind: PipelineKind, series: &AlignedSeries, filter: &FilterState) -> ChartView {
    match kind {
        PipelineKind::Attrition => present_attrition(series, filter),
        PipelineKind::Shrinkage => present_shrinkage(series),
    }
}

/// Bar per date with the same values drawn again as a trend line.
pub fn present_attrition(series: &AlignedSeries, filter: &FilterState) -> ChartView {
    let rates = series.actual();
    let title = match filter.active_year() {
        Some(year) => format!("Attrition Rates Over Time ({})", year),
        None => "Attrition Rates Over Time".to_string(),
    };

    ChartView {
        title,
        legend_position: "top".to_string(),
        labels: series.labels(),
        datasets: vec![
            Dataset::bar("Attrition Rate (%)", rates.clone(), ATTRITION_BAR_COLOR),
            Dataset::line("Trend Line", rates, TREND_LINE_COLOR).with_border(2, 3),
        ],
        x_axis: axis("Date"),
        y_axis: axis("Attrition Percentage"),
    }
}

pub fn present_shrinkage(series: &AlignedSeries) -> ChartView {
    ChartView {
        title: "Actual vs Predicted Shrinkage Data".to_string(),
        legend_position: "top".to_string(),
        labels: series.labels(),
        datasets: vec![
            Dataset::line("Actual", series.actual(), ACTUAL_COLOR)
                .with_border(3, 0)
                .with_tension(0.4),
            Dataset::line("Predicted", series.predicted(), PREDICTED_COLOR)
                .with_border(3, 0)
                .with_tension(0.4),
        ],
        x_axis: axis("Date"),
        y_axis: axis("Shrinkage Percentage"),
    }
}

fn axis(title: &str) -> AxisView {
    AxisView {
        title: title.to_string(),
        begin_at_zero: true,
    }
}
