//! Resolution of user supplied date expressions into UTC instants.
//!
//! Accepted forms, tried in order:
//! - absolute dates (`2024-03-01`, `2024-03-01 12:30`, RFC 3339, ...);
//! - date-math (`now-7d`, `now-1M/M`, `2024-03-01||+2w`);
//! - natural durations (`3 days ago`, `36h ago`).

use crate::error::{GitanalError, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use std::str::FromStr;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A "since" bound as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    At(DateTime<Utc>),
    /// Relative to the moment of resolution.
    Ago(Duration),
}

impl Default for DateSpec {
    fn default() -> Self {
        DateSpec::Ago(Duration::days(7))
    }
}

impl DateSpec {
    pub fn parse_at(input: &str, now: DateTime<Utc>) -> Result<Self> {
        let input = input.trim();
        if let Some(dt) = parse_absolute(input) {
            return Ok(DateSpec::At(dt));
        }
        if let Some(dt) = parse_datemath(input, now) {
            return Ok(DateSpec::At(dt));
        }
        if let Some(duration) = parse_natural_duration(input) {
            if now.checked_sub_signed(duration).is_some() {
                return Ok(DateSpec::Ago(duration));
            }
        }
        Err(GitanalError::DateParse(input.to_string()))
    }

    /// The instant this bound stands for at `now`. Spans reaching before the
    /// representable range clamp to its start.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DateSpec::At(dt) => *dt,
            DateSpec::Ago(duration) => now
                .checked_sub_signed(*duration)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl FromStr for DateSpec {
    type Err = GitanalError;

    fn from_str(s: &str) -> Result<Self> {
        DateSpec::parse_at(s, Utc::now())
    }
}

fn parse_absolute(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    None
}

fn parse_datemath(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (mut dt, mut rest) = if let Some(rest) = input.strip_prefix("now") {
        (now, rest)
    } else {
        let (anchor, rest) = input.split_once("||")?;
        (parse_absolute(anchor.trim())?, rest)
    };

    while !rest.is_empty() {
        let op = rest.chars().next()?;
        rest = &rest[op.len_utf8()..];
        match op {
            '+' | '-' => {
                let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
                let amount: u32 = if digits == 0 { 1 } else { rest[..digits].parse().ok()? };
                rest = &rest[digits..];
                let unit = rest.chars().next()?;
                rest = &rest[unit.len_utf8()..];
                dt = shift(dt, op == '-', amount, unit)?;
            }
            '/' => {
                let unit = rest.chars().next()?;
                rest = &rest[unit.len_utf8()..];
                dt = round_down(dt, unit)?;
            }
            _ => return None,
        }
    }

    Some(dt)
}

fn shift(dt: DateTime<Utc>, backwards: bool, amount: u32, unit: char) -> Option<DateTime<Utc>> {
    let months = match unit {
        'y' => Some(amount.checked_mul(12)?),
        'M' => Some(amount),
        _ => None,
    };
    if let Some(m) = months {
        return if backwards {
            dt.checked_sub_months(Months::new(m))
        } else {
            dt.checked_add_months(Months::new(m))
        };
    }

    let amount = i64::from(amount);
    let delta = match unit {
        'w' => Duration::weeks(amount),
        'd' => Duration::days(amount),
        'h' | 'H' => Duration::hours(amount),
        'm' => Duration::minutes(amount),
        's' => Duration::seconds(amount),
        _ => return None,
    };
    if backwards {
        dt.checked_sub_signed(delta)
    } else {
        dt.checked_add_signed(delta)
    }
}

fn round_down(dt: DateTime<Utc>, unit: char) -> Option<DateTime<Utc>> {
    let date = dt.date_naive();
    let naive = match unit {
        'y' => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        'M' => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?,
        'w' => {
            let back = Duration::days(i64::from(date.weekday().num_days_from_monday()));
            (date - back).and_hms_opt(0, 0, 0)?
        }
        'd' => date.and_hms_opt(0, 0, 0)?,
        'h' | 'H' => date.and_hms_opt(dt.hour(), 0, 0)?,
        'm' => date.and_hms_opt(dt.hour(), dt.minute(), 0)?,
        's' => date.and_hms_opt(dt.hour(), dt.minute(), dt.second())?,
        _ => return None,
    };
    Some(Utc.from_utc_datetime(&naive))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let span = input.strip_suffix(" ago")?.trim();

    let units: [(&str, i64); 3] = [(" days", 1), (" weeks", 7), (" months", 30)];
    for (suffix, days) in units {
        if let Some(n) = span.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<i64>() {
                return n.checked_mul(days).and_then(Duration::try_days);
            }
        }
    }

    let std = humantime::parse_duration(span).ok()?;
    Duration::from_std(std).ok()
}
