use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indexdash_client::prelude::*;
use indexdash_view::render::{self, RenderOptions};
use indexdash_view::{charts, Dashboard, ViewState};
use std::time::Duration;

mod cli;
mod ui;

fn preprocess(level: log::LevelFilter) {
    // initialise logger; RUST_LOG overrides the command line level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn client(cli: &cli::Cli) -> Result<IndexClient> {
    let mut config = ClientConfig::new(&cli.api_url)
        .with_timeout(cli.timeout_secs.map(Duration::from_secs));
    if let Some(user_agent) = &cli.user_agent {
        config = config.with_user_agent(user_agent);
    }
    build_client(&config).with_context(|| format!("invalid backend address `{}`", cli.api_url))
}

#[tokio::main]
async fn main() -> Result<()> {
    // grant access to .env before clap reads the environment
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    preprocess(cli.log_level.into());
    log::trace!("Command line input recorded: {cli:#?}");

    let client = client(&cli)?;

    // cli framework:
    // "> indexdash <COMMAND>"
    match &cli.command {
        // "> indexdash indices"
        cli::Commands::Indices => {
            for index in client.list_indices().await? {
                println!("{index}");
            }
        }

        // "> indexdash show <INDEX> [--start] [--end] [--json]"
        cli::Commands::Show(args) => {
            let mut dashboard = Dashboard::new(client).with_forecast_days(args.days);
            dashboard.select_index(args.index.as_str());
            dashboard.set_dates(args.start, args.end);
            load(&mut dashboard).await?;

            if args.json {
                ensure_loaded(dashboard.state())?;
                let charts = charts(dashboard.state());
                println!("{}", serde_json::to_string_pretty(&charts)?);
            } else {
                print!("{}", render::render(dashboard.state(), &render_options(&args.render)));
                ensure_loaded(dashboard.state())?;
            }
        }

        // "> indexdash dashboard"
        cli::Commands::Dashboard(args) => {
            let dashboard = Dashboard::new(client).with_forecast_days(args.days);
            interactive(dashboard, render_options(&args.render)).await?;
        }

        // "> indexdash health"
        cli::Commands::Health => {
            if client.health().await? {
                println!("{} {}", "ok".green(), client.base_url());
            } else {
                println!("{} {}", "unhealthy".red(), client.base_url());
            }
        }
    }

    Ok(())
}

fn render_options(args: &cli::RenderArgs) -> RenderOptions {
    RenderOptions {
        width: args.width,
        table_rows: args.rows,
    }
}

/// A failed history request is an error for one-shot commands, even after the empty view printed.
fn ensure_loaded(state: &ViewState) -> Result<()> {
    if state.has_error {
        let reason = state.last_error.as_deref().unwrap_or("unknown error");
        anyhow::bail!("failed to load history: {reason}");
    }
    Ok(())
}

async fn load(dashboard: &mut Dashboard<IndexClient>) -> Result<()> {
    let pb = ui::spinner(render::LOADING_MESSAGE)?;
    dashboard.load_data().await;
    pb.finish_and_clear();
    Ok(())
}

/// Mount, then keep asking for an index and date range until the user is done.
async fn interactive(mut dashboard: Dashboard<IndexClient>, opts: RenderOptions) -> Result<()> {
    dashboard.on_mount().await;
    print!("{}", render::render(dashboard.state(), &opts));

    if dashboard.state().indices.is_empty() {
        anyhow::bail!("no indices to choose from");
    }

    loop {
        let state = dashboard.state();
        let Some(index) = ui::select_index(&state.indices, state.load_target())? else {
            break;
        };
        let start = ui::date_bound("Start date", state.start_date)?;
        let end = ui::date_bound("End date", state.end_date)?;

        dashboard.select_index(index);
        dashboard.set_dates(start, end);
        load(&mut dashboard).await?;
        print!("{}", render::render(dashboard.state(), &opts));

        if !ui::again()? {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexdash_view::Action;

    fn started() -> ViewState {
        let state = ViewState::default();
        let state = indexdash_view::reduce(state, Action::SelectIndex("NIFTY 50".to_string()));
        indexdash_view::reduce(state, Action::LoadStarted { token: 1 })
    }

    #[test]
    fn failed_history_is_an_error() {
        let state = indexdash_view::reduce(
            started(),
            Action::LoadFailed {
                token: 1,
                error: "GET /history returned 500".to_string(),
            },
        );

        let err = ensure_loaded(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to load history: GET /history returned 500"
        );
    }

    #[test]
    fn empty_history_is_not_an_error() {
        let state = indexdash_view::reduce(
            started(),
            Action::LoadSucceeded {
                token: 1,
                history: vec![],
                predictions: vec![],
            },
        );

        assert!(state.is_empty);
        assert!(ensure_loaded(&state).is_ok());
    }
}
