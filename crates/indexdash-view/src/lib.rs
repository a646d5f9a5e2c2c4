pub mod chart;
pub mod controller;
pub mod render;
pub mod state;

pub use chart::{charts, Charts};
pub use controller::{Dashboard, LoadOutcome, LoadTicket};
pub use state::{reduce, Action, ViewState};
