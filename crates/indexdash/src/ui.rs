use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input};
use indexdash_client::schema::DATE_FORMAT;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a load is in flight.
pub fn spinner(msg: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg:.yellow} [{elapsed}]")?
            .tick_chars("|/-\\ "),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Fuzzy-pick one of `indices`, starting on `current` if it is listed. `None` when the user
/// backs out with Esc or q.
pub fn select_index(indices: &[String], current: Option<&str>) -> Result<Option<String>> {
    let default = current
        .and_then(|name| indices.iter().position(|i| i == name))
        .unwrap_or(0);

    let picked = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select index")
        .items(indices)
        .default(default)
        .interact_opt()?;

    Ok(picked.map(|i| indices[i].clone()))
}

/// Ask for an optional date; blank means no bound.
pub fn date_bound(prompt: &str, current: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let initial = current
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{prompt} (YYYY-MM-DD, blank for none)"))
        .with_initial_text(initial)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            parse_bound(input)
                .map(|_| ())
                .map_err(|_| format!("`{input}` is not a YYYY-MM-DD date"))
        })
        .interact_text()?;

    Ok(parse_bound(&text)?)
}

pub fn again() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Load another?")
        .default(true)
        .interact()?)
}

fn parse_bound(input: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_bound_is_none() {
        assert_eq!(parse_bound("").unwrap(), None);
        assert_eq!(parse_bound("   ").unwrap(), None);
    }

    #[test]
    fn bound_is_parsed() {
        assert_eq!(
            parse_bound(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_bound("2023-02-29").is_err());
        assert!(parse_bound("29 Feb 2024").is_err());
    }
}
