//! The time-of-day control: slider values, CLI time arguments and the
//! 12-hour label shown next to the slider.

use crate::traffic::{MinuteOfDay, TimeFilter};
use anyhow::{Context, Result, bail};
use chrono::NaiveTime;

/// Slider value meaning "no filter".
pub const NO_FILTER: i32 = -1;

/// Label shown while no filter is active.
pub const ANY_TIME_LABEL: &str = "(any time)";

/// Converts a raw slider position into a filter.
pub fn from_slider(value: i32) -> Result<TimeFilter> {
    match value {
        NO_FILTER => Ok(TimeFilter::Any),
        v if v >= 0 => TimeFilter::at(v as u32),
        v => bail!("slider value {v} is neither -1 nor a minute of day"),
    }
}

/// The slider position for a filter.
pub fn to_slider(filter: TimeFilter) -> i32 {
    filter.minute().map_or(NO_FILTER, |m| m as i32)
}

/// Parses a CLI time argument.
///
/// Accepts `any`/`none`/`-1`, a bare minute of day (`870`), a 24-hour time
/// (`14:30`) or a 12-hour time (`2:30 PM`).
pub fn parse_time_arg(arg: &str) -> Result<TimeFilter> {
    let arg = arg.trim();
    if arg.eq_ignore_ascii_case("any") || arg.eq_ignore_ascii_case("none") {
        return Ok(TimeFilter::Any);
    }

    if let Ok(value) = arg.parse::<i32>() {
        return from_slider(value);
    }

    let time = NaiveTime::parse_from_str(arg, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&arg.to_ascii_uppercase(), "%I:%M %p"))
        .with_context(|| format!("unrecognised time '{arg}'"))?;

    Ok(TimeFilter::At(MinuteOfDay::from(&time)))
}

/// Label for the current filter, e.g. `2:30 PM`.
pub fn format_label(filter: TimeFilter) -> String {
    match filter {
        TimeFilter::Any => ANY_TIME_LABEL.to_string(),
        TimeFilter::At(m) => m.to_time().format("%-I:%M %p").to_string(),
    }
}
