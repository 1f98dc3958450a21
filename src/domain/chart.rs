// Chart description and panel state domain models
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Bar,
    Line,
}

/// One plotted series with its visual encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(rename = "type")]
    pub kind: DatasetKind,
    pub label: String,
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    pub fill: bool,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: String,
}

impl Dataset {
    pub fn bar(label: &str, data: Vec<Option<f64>>, background_color: &str) -> Self {
        Self {
            kind: DatasetKind::Bar,
            label: label.to_string(),
            data,
            background_color: Some(background_color.to_string()),
            border_color: None,
            border_width: None,
            point_radius: None,
            tension: None,
            fill: false,
            y_axis_id: "y".to_string(),
        }
    }

    pub fn line(label: &str, data: Vec<Option<f64>>, border_color: &str) -> Self {
        Self {
            kind: DatasetKind::Line,
            label: label.to_string(),
            data,
            background_color: None,
            border_color: Some(border_color.to_string()),
            border_width: None,
            point_radius: None,
            tension: None,
            fill: false,
            y_axis_id: "y".to_string(),
        }
    }

    pub fn with_border(mut self, width: u32, point_radius: u32) -> Self {
        self.border_width = Some(width);
        self.point_radius = Some(point_radius);
        self
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisView {
    pub title: String,
    pub begin_at_zero: bool,
}

/// A chart ready to hand to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub title: String,
    pub legend_position: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub x_axis: AxisView,
    pub y_axis: AxisView,
}

/// What a chart panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PanelState {
    Loading,
    Ready { chart: ChartView },
    NoData { message: String },
    Error { kind: String, message: String },
}

impl PanelState {
    pub fn no_data() -> Self {
        PanelState::NoData {
            message: "No data found".to_string(),
        }
    }
}
