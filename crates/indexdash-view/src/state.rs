use chrono::NaiveDate;
use indexdash_client::prelude::{HistoryRecord, IndexName, PredictionRecord};

/// Snapshot of everything the dashboard shows.
///
/// Only [`reduce`] changes it. `is_empty` and `has_error` render the same message but are kept
/// apart so callers can tell "zero rows" from "the request failed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub indices: Vec<IndexName>,
    pub indices_error: Option<String>,

    pub selected_index: Option<IndexName>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub history: Vec<HistoryRecord>,
    pub predictions: Vec<PredictionRecord>,

    pub loading: bool,
    pub is_empty: bool,
    pub has_error: bool,
    pub last_error: Option<String>,

    /// Token of the most recently started load; results carrying any other token are stale.
    pub request_token: u64,
}

/// What the user should be looking at right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    NoData,
    Ready,
}

impl ViewState {
    /// Zero rows or a failed request. Only meaningful once `loading` is false.
    pub fn no_data(&self) -> bool {
        self.is_empty || self.has_error
    }

    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.no_data() {
            Status::NoData
        } else if !self.history.is_empty() {
            Status::Ready
        } else {
            Status::Idle
        }
    }

    /// The index a load would be issued for, exactly as selected; blank names don't count.
    pub fn load_target(&self) -> Option<&str> {
        self.selected_index
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    pub fn next_token(&self) -> u64 {
        self.request_token + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    IndicesLoaded(Vec<IndexName>),
    IndicesFailed(String),
    SelectIndex(IndexName),
    SetStartDate(Option<NaiveDate>),
    SetEndDate(Option<NaiveDate>),
    LoadStarted {
        token: u64,
    },
    LoadSucceeded {
        token: u64,
        history: Vec<HistoryRecord>,
        predictions: Vec<PredictionRecord>,
    },
    LoadFailed {
        token: u64,
        error: String,
    },
}

/// Apply `action` to `state`.
pub fn reduce(mut state: ViewState, action: Action) -> ViewState {
    match action {
        Action::IndicesLoaded(indices) => {
            state.indices = indices;
            state.indices_error = None;
        }

        Action::IndicesFailed(error) => {
            state.indices.clear();
            state.indices_error = Some(error);
        }

        Action::SelectIndex(index) => {
            state.selected_index = (!index.trim().is_empty()).then_some(index);
        }

        Action::SetStartDate(date) => state.start_date = date,

        Action::SetEndDate(date) => state.end_date = date,

        Action::LoadStarted { token } => {
            if state.load_target().is_none() || token <= state.request_token {
                return state;
            }
            state.request_token = token;
            state.loading = true;
            state.is_empty = false;
            state.has_error = false;
            state.last_error = None;
        }

        Action::LoadSucceeded {
            token,
            history,
            predictions,
        } => {
            if token != state.request_token {
                return state;
            }
            state.is_empty = history.is_empty();
            state.history = history;
            state.predictions = predictions;
            state.loading = false;
        }

        // stale charts are cleared rather than left on screen next to the error
        Action::LoadFailed { token, error } => {
            if token != state.request_token {
                return state;
            }
            state.has_error = true;
            state.last_error = Some(error);
            state.history.clear();
            state.predictions.clear();
            state.loading = false;
        }
    }
    state
}
