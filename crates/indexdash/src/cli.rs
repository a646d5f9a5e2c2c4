use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indexdash_client::prelude::{DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base address of the index backend.
    #[arg(long, env = "INDEXDASH_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Give up on a request after this many seconds; requests never time out by default.
    #[arg(long, env = "INDEXDASH_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request.
    #[arg(long, env = "USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Sets the level of logging; `RUST_LOG` still takes precedence.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, ignore_case = true, global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every index the backend tracks.
    Indices,

    /// Chart one index: closing value with forecast, % change, and PE ratio.
    Show(ShowArgs),

    /// Pick indices and date ranges interactively, charting each one.
    Dashboard(DashboardArgs),

    /// Check the backend is up.
    Health,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Index name, exactly as `indices` lists it.
    pub index: String,

    /// First day to include (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Days ahead to forecast.
    #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
    pub days: u32,

    /// Print the chart datasets as JSON instead of drawing them.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Days ahead to forecast.
    #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
    pub days: u32,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct RenderArgs {
    /// Widest a chart line may get, in characters.
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Most recent rows to list under the charts.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}
