use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for dates in query strings, e.g. `2024-01-31`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name of a tracked market index, exactly as the backend lists it (e.g. `"NIFTY 50"`).
pub type IndexName = String;

/// One trading day of an index.
///
/// ```json
/// {
///     "index_name": "NIFTY 50",
///     "index_date": "2024-01-01",
///     "closing_index_value": 21731.4,
///     "change_percent": 0.05,
///     "pe_ratio": 22.9
/// }
/// ```
///
/// The backend also sends open/high/low and volume columns; they are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub index_date: String,
    pub closing_index_value: f64,
    pub change_percent: f64,
    pub pe_ratio: Option<f64>,
}

/// One forecast day.
///
/// ```json
/// { "index_date": "2024-01-03", "predicted_close": 21800.0 }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub index_date: String,
    pub predicted_close: f64,
}

/// Parse the leading `YYYY-MM-DD` of a date label; pandas timestamps arrive as
/// `2024-01-01T00:00:00`.
pub fn parse_label_date(label: &str) -> Option<NaiveDate> {
    let head = label.get(..10).unwrap_or(label);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

// envelopes --------------------------------------------------------------------------------------

/// `GET /indices`
#[derive(Deserialize, Debug, Default)]
pub struct IndicesEnvelope {
    #[serde(default)]
    pub indices: Vec<IndexName>,
}

/// `GET /history`
///
/// An empty range comes back as `{"data": [], "message": "..."}`; an internal failure on the
/// backend as `{"error": "..."}` with a 200 status.
#[derive(Deserialize, Debug, Default)]
pub struct HistoryEnvelope {
    pub data: Option<Vec<HistoryRecord>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// `GET /predict`
#[derive(Deserialize, Debug, Default)]
pub struct PredictionsEnvelope {
    pub predictions: Option<Vec<PredictionRecord>>,
}

/// `GET /health`
#[derive(Deserialize, Debug, Default)]
pub struct HealthEnvelope {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_envelope_ignores_extra_columns() {
        let envelope: HistoryEnvelope = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "index_name": "NIFTY 50",
                        "index_date": "2024-01-01T00:00:00",
                        "open_index_value": 99.0,
                        "closing_index_value": 100.0,
                        "change_percent": 0.5,
                        "pe_ratio": 22.1
                    },
                    {
                        "index_name": "NIFTY 50",
                        "index_date": "2024-01-02T00:00:00",
                        "closing_index_value": 102.0,
                        "change_percent": 2.0,
                        "pe_ratio": null
                    }
                ]
            }"#,
        )
        .unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].closing_index_value, 100.0);
        assert_eq!(data[0].pe_ratio, Some(22.1));
        assert_eq!(data[1].pe_ratio, None);
    }

    #[test]
    fn missing_pe_ratio_is_none() {
        let record: HistoryRecord = serde_json::from_str(
            r#"{ "index_date": "2024-01-01", "closing_index_value": 1.0, "change_percent": 0.0 }"#,
        )
        .unwrap();
        assert_eq!(record.pe_ratio, None);
    }

    #[test]
    fn backend_error_envelope_has_no_rows() {
        let envelope: HistoryEnvelope =
            serde_json::from_str(r#"{ "error": "boom" }"#).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("boom"));
    }

    #[test]
    fn label_dates_accept_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(parse_label_date("2024-01-02"), expected);
        assert_eq!(parse_label_date("2024-01-02T00:00:00"), expected);
        assert_eq!(parse_label_date("02/01/2024"), None);
        assert_eq!(parse_label_date(""), None);
    }
}
