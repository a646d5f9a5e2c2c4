use crate::state::{reduce, Action, ViewState};
use chrono::NaiveDate;
use indexdash_client::prelude::*;

/// Everything needed to run one load, captured when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: u64,
    pub index: IndexName,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days: u32,
}

/// Result of one load, tagged with the ticket's token.
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: u64,
    pub index: IndexName,
    pub result: Result<(Vec<HistoryRecord>, Vec<PredictionRecord>), ApiError>,
}

/// Drives the [`IndexApi`] calls and feeds their results through [`reduce`].
pub struct Dashboard<A> {
    api: A,
    state: ViewState,
    forecast_days: u32,
}

impl<A: IndexApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn with_forecast_days(mut self, days: u32) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn select_index(&mut self, index: impl Into<IndexName>) {
        self.dispatch(Action::SelectIndex(index.into()));
    }

    pub fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.dispatch(Action::SetStartDate(start));
        self.dispatch(Action::SetEndDate(end));
    }

    /// Reset the view and fill the index selector. A failed listing is retried once; if that
    /// fails too the error is kept in `indices_error` for the front end to show.
    ///
    /// The request token survives the reset, so loads started before it stay stale.
    pub async fn on_mount(&mut self) {
        self.state = ViewState {
            request_token: self.state.request_token,
            ..ViewState::default()
        };

        let listed = match self.api.list_indices().await {
            Ok(indices) => Ok(indices),
            Err(e) => {
                log::warn!("listing indices failed, retrying once: {e}");
                self.api.list_indices().await
            }
        };

        match listed {
            Ok(indices) => {
                log::info!("{} indices available", indices.len());
                self.dispatch(Action::IndicesLoaded(indices));
            }
            Err(e) => {
                log::error!("listing indices failed: {e}");
                self.dispatch(Action::IndicesFailed(e.to_string()));
            }
        }
    }

    /// Fetch history and forecast for the selected index at the same time and store both.
    /// Does nothing when no index is selected.
    pub async fn load_data(&mut self) {
        let Some(ticket) = self.begin_load() else {
            log::debug!("no index selected; nothing to load");
            return;
        };
        let outcome = fetch(&self.api, ticket).await;
        self.finish(outcome);
    }

    /// Mark a load as started and hand back its ticket. Starting another load before this one
    /// finishes makes this one stale.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let index = self.state.load_target()?.to_string();
        let token = self.state.next_token();
        self.dispatch(Action::LoadStarted { token });

        Some(LoadTicket {
            token,
            index,
            start: self.state.start_date,
            end: self.state.end_date,
            days: self.forecast_days,
        })
    }

    pub fn finish(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            token,
            index,
            result,
        } = outcome;

        if token != self.state.request_token {
            log::debug!("[{index}] dropping stale load #{token}");
            return;
        }

        match result {
            Ok((history, predictions)) => {
                log::info!(
                    "[{index}] {} history rows, {} predictions",
                    history.len(),
                    predictions.len()
                );
                self.dispatch(Action::LoadSucceeded {
                    token,
                    history,
                    predictions,
                });
            }
            Err(e) => {
                log::error!("[{index}] history request failed: {e}");
                self.dispatch(Action::LoadFailed {
                    token,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Run both requests for `ticket` concurrently. Only the history call can fail; the forecast
/// degrades to empty on its own.
pub async fn fetch<A: IndexApi>(api: &A, ticket: LoadTicket) -> LoadOutcome {
    let (history, predictions) = futures::join!(
        api.fetch_history(&ticket.index, ticket.start, ticket.end),
        api.fetch_predictions(&ticket.index, ticket.days)
    );

    LoadOutcome {
        token: ticket.token,
        index: ticket.index,
        result: history.map(|history| (history, predictions)),
    }
}
