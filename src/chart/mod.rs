use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::db::ResultSet;

/// The visualization kinds a result set can be drawn as.
///
/// Bar, pie and line are reachable through question keywords; scatter and
/// histogram only through an explicit user choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
    Histogram,
}

impl ChartKind {
    /// Fewest result columns the kind can be drawn from.
    fn min_columns(self) -> usize {
        match self {
            ChartKind::Histogram => 1,
            ChartKind::Bar | ChartKind::Pie | ChartKind::Line | ChartKind::Scatter => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            "line" => Ok(ChartKind::Line),
            "scatter" => Ok(ChartKind::Scatter),
            "histogram" => Ok(ChartKind::Histogram),
            other => Err(format!("Unknown chart kind: {}", other)),
        }
    }
}

/// Keyword sets per kind, in priority order. First structural match wins.
const CHART_KEYWORDS: &[(ChartKind, &[&str])] = &[
    (ChartKind::Bar, &["compare", "comparison", "categories", "bar chart"]),
    (ChartKind::Pie, &["distribution", "percentage", "proportion", "pie chart"]),
    (ChartKind::Line, &["trend", "time series", "over time", "line chart"]),
];

/// Pick a chart kind from the question text. Defaults to bar.
pub fn select_chart(question: &str) -> ChartKind {
    let question = question.to_lowercase();
    for (kind, keywords) in CHART_KEYWORDS {
        if keywords.iter().any(|keyword| question.contains(keyword)) {
            return *kind;
        }
    }
    ChartKind::Bar
}

/// Build a Plotly figure object from the result set.
///
/// Column 0 is always the category/x/names field and column 1 the values
/// field; nothing checks that the data is actually categorical or numeric.
/// Returns None when the shape cannot support the kind (too few columns, or
/// no rows at all), which callers surface as "visualization not supported".
pub fn render(data: &ResultSet, kind: ChartKind) -> Option<Value> {
    if data.is_empty() || data.columns.len() < kind.min_columns() {
        return None;
    }

    let x = data.column_values(0);
    let figure = match kind {
        ChartKind::Bar => json!({
            "data": [{"type": "bar", "x": x, "y": data.column_values(1)}],
            "layout": axis_layout(&data.columns[0], &data.columns[1]),
        }),
        ChartKind::Pie => json!({
            "data": [{"type": "pie", "labels": x, "values": data.column_values(1)}],
            "layout": {},
        }),
        ChartKind::Line => json!({
            "data": [{"type": "scatter", "mode": "lines", "x": x, "y": data.column_values(1)}],
            "layout": axis_layout(&data.columns[0], &data.columns[1]),
        }),
        ChartKind::Scatter => json!({
            "data": [{"type": "scatter", "mode": "markers", "x": x, "y": data.column_values(1)}],
            "layout": axis_layout(&data.columns[0], &data.columns[1]),
        }),
        ChartKind::Histogram => json!({
            "data": [{"type": "histogram", "x": x}],
            "layout": {"xaxis": {"title": data.columns[0]}},
        }),
    };

    Some(figure)
}

fn axis_layout(x: &str, y: &str) -> Value {
    json!({"xaxis": {"title": x}, "yaxis": {"title": y}})
}
