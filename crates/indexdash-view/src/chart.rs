use crate::state::ViewState;
use indexdash_client::prelude::{HistoryRecord, PredictionRecord};
use serde::Serialize;
use std::iter;

pub const CLOSING_TITLE: &str = "Closing Value (with Predictions)";
pub const CHANGE_TITLE: &str = "% Change";
pub const PE_TITLE: &str = "PE Ratio";

const CLOSE_COLOR: Rgb = Rgb(75, 192, 192);
const PREDICTED_COLOR: Rgb = Rgb(255, 99, 132);
const CHANGE_COLOR: Rgb = Rgb(255, 159, 64);
const PE_COLOR: Rgb = Rgb(153, 102, 255);
const TENSION: f64 = 0.2;
const FORECAST_DASH: [u8; 2] = [5, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }

    pub fn css_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {alpha})", self.0, self.1, self.2)
    }
}

/// One line on a chart. `None` entries are gaps.
///
/// Serializes in the shape Chart.js expects for a line dataset:
/// ```json
/// {
///     "label": "Predicted Close",
///     "data": [null, 102.0, 103.0],
///     "borderColor": "rgb(255, 99, 132)",
///     "backgroundColor": "rgba(255, 99, 132, 0.4)",
///     "borderDash": [5, 5],
///     "tension": 0.2
/// }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    pub tension: f64,
    #[serde(skip)]
    pub color: Rgb,
}

impl Dataset {
    fn line(label: &str, color: Rgb, data: Vec<Option<f64>>) -> Self {
        Self {
            label: label.to_string(),
            data,
            border_color: color.css(),
            background_color: color.css_alpha(0.4),
            border_dash: None,
            tension: TENSION,
            color,
        }
    }

    fn dashed(mut self) -> Self {
        self.border_dash = Some(FORECAST_DASH);
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// The three dashboard charts.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Charts {
    pub closing: Chart,
    pub change: Chart,
    pub pe_ratio: Chart,
}

impl Charts {
    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        [&self.closing, &self.change, &self.pe_ratio].into_iter()
    }
}

/// Charts for the current state; nothing renders until there is history to show.
pub fn charts(state: &ViewState) -> Option<Charts> {
    project(&state.history, &state.predictions)
}

pub fn project(history: &[HistoryRecord], predictions: &[PredictionRecord]) -> Option<Charts> {
    let last = history.last()?;

    let history_labels: Vec<String> = history.iter().map(|r| r.index_date.clone()).collect();

    // history dates, then forecast dates; neither sorted nor de-duplicated
    let closing_labels = history_labels
        .iter()
        .cloned()
        .chain(predictions.iter().map(|p| p.index_date.clone()))
        .collect();

    let closes = history
        .iter()
        .map(|r| Some(r.closing_index_value))
        .collect();

    // the forecast line starts on the last real close so the two lines join without a gap
    let forecast = iter::repeat(None)
        .take(history.len() - 1)
        .chain(iter::once(Some(last.closing_index_value)))
        .chain(predictions.iter().map(|p| Some(p.predicted_close)))
        .collect();

    let closing = Chart {
        title: CLOSING_TITLE.to_string(),
        labels: closing_labels,
        datasets: vec![
            Dataset::line("Closing Value", CLOSE_COLOR, closes),
            Dataset::line("Predicted Close", PREDICTED_COLOR, forecast).dashed(),
        ],
    };

    let change = Chart {
        title: CHANGE_TITLE.to_string(),
        labels: history_labels.clone(),
        datasets: vec![Dataset::line(
            "% Change",
            CHANGE_COLOR,
            history.iter().map(|r| Some(r.change_percent)).collect(),
        )],
    };

    let pe_ratio = Chart {
        title: PE_TITLE.to_string(),
        labels: history_labels,
        datasets: vec![Dataset::line(
            "PE Ratio",
            PE_COLOR,
            history.iter().map(|r| r.pe_ratio).collect(),
        )],
    };

    Some(Charts {
        closing,
        change,
        pe_ratio,
    })
}
