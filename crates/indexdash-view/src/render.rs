use crate::chart::{charts, Chart, Charts, Dataset};
use crate::state::{Status, ViewState};
use colored::Colorize;
use indexdash_client::schema::parse_label_date;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const NO_DATA_MESSAGE: &str = "No data found for the selected index/date range.";

const TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const AXIS_FORMAT: &str = "%b %Y";
const ROW_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Widest a sparkline may get, in characters.
    pub width: usize,
    /// How many of the most recent rows to list under the charts; 0 for none.
    pub table_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            table_rows: 10,
        }
    }
}

/// Render the whole dashboard for `state` as terminal text.
pub fn render(state: &ViewState, opts: &RenderOptions) -> String {
    let mut out = String::new();

    if let Some(error) = &state.indices_error {
        let message = format!("Could not load the index list: {error}");
        out.push_str(&format!("{}\n", message.red()));
    }

    match state.status() {
        Status::Loading => {
            out.push_str(&format!("{}\n", LOADING_MESSAGE.yellow()));
        }
        Status::NoData => {
            out.push_str(&format!("{}\n", NO_DATA_MESSAGE.red()));
        }
        Status::Ready => {
            if let Some(charts) = charts(state) {
                out.push_str(&render_charts(&charts, opts));
            }
        }
        Status::Idle => {}
    }

    out
}

pub fn render_charts(charts: &Charts, opts: &RenderOptions) -> String {
    let mut out = String::new();
    for chart in charts.iter() {
        out.push_str(&render_chart(chart, opts.width));
        out.push('\n');
    }
    if opts.table_rows > 0 {
        out.push_str(&render_table(charts, opts.table_rows));
    }
    out
}

pub fn render_chart(chart: &Chart, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", chart.title.bold()));

    // every dataset shares the label axis, so they are all stretched to its length
    let len = chart.labels.len();
    let label_width = chart
        .datasets
        .iter()
        .map(|d| d.label.chars().count())
        .max()
        .unwrap_or(0);

    for dataset in &chart.datasets {
        let mut data = dataset.data.clone();
        data.resize(len, None);
        let line = sparkline(&downsample(&data, width));
        out.push_str(&format!(
            "  {:<label_width$}  {}  {}\n",
            paint(dataset, &dataset.label),
            paint(dataset, &line),
            range(&dataset.data).dimmed()
        ));
    }

    if let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) {
        out.push_str(&format!(
            "  {:<label_width$}  {} .. {}\n",
            "",
            format_label(first, AXIS_FORMAT),
            format_label(last, AXIS_FORMAT)
        ));
    }

    out
}

/// The last `rows` labels of the closing chart, one line each, with every series' value.
pub fn render_table(charts: &Charts, rows: usize) -> String {
    let mut out = String::new();
    let closing = &charts.closing;
    let skip = closing.labels.len().saturating_sub(rows);

    let header = format!(
        "{:<12} {:>12} {:>12} {:>10} {:>10}",
        "Date", "Close", "Predicted", "% Change", "PE Ratio"
    );
    out.push_str(&format!("{}\n", header.bold()));

    for (i, label) in closing.labels.iter().enumerate().skip(skip) {
        let value = |dataset: Option<&Dataset>| {
            dataset
                .and_then(|d| d.data.get(i).copied().flatten())
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "-".to_string())
        };
        out.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>10} {:>10}\n",
            format_label(label, ROW_FORMAT),
            value(closing.datasets.first()),
            value(closing.datasets.get(1)),
            value(charts.change.datasets.first()),
            value(charts.pe_ratio.datasets.first()),
        ));
    }

    out
}

fn paint(dataset: &Dataset, text: &str) -> colored::ColoredString {
    let color = dataset.color;
    text.truecolor(color.0, color.1, color.2)
}

fn range(data: &[Option<f64>]) -> String {
    let values = data.iter().flatten();
    let min = values.clone().copied().fold(f64::INFINITY, f64::min);
    let max = values.copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        format!("[{min:.2} .. {max:.2}]")
    } else {
        String::new()
    }
}

/// One tick per value, scaled between the series' min and max; gaps stay blank.
pub fn sparkline(data: &[Option<f64>]) -> String {
    let min = data.iter().flatten().copied().fold(f64::INFINITY, f64::min);
    let max = data
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    data.iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if span <= 0.0 => TICKS[TICKS.len() / 2],
            Some(v) => {
                let level = ((v - min) / span * (TICKS.len() - 1) as f64).round() as usize;
                TICKS[level.min(TICKS.len() - 1)]
            }
        })
        .collect()
}

/// Pick at most `width` evenly spaced points, always keeping the first and last.
pub fn downsample(data: &[Option<f64>], width: usize) -> Vec<Option<f64>> {
    if width == 0 || data.len() <= width {
        return data.to_vec();
    }
    if width == 1 {
        return data.last().copied().into_iter().collect();
    }
    let step = (data.len() - 1) as f64 / (width - 1) as f64;
    (0..width)
        .map(|i| data[((i as f64 * step).round() as usize).min(data.len() - 1)])
        .collect()
}

/// Format a date label with `fmt`, or hand it back untouched if it isn't a date.
pub fn format_label(label: &str, fmt: &str) -> String {
    parse_label_date(label)
        .map(|date| date.format(fmt).to_string())
        .unwrap_or_else(|| label.to_string())
}
