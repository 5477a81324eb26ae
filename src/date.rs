use crate::error::CliError;
use chrono::{Datelike, Local, NaiveDate, Timelike};

const DAY_FMT: &str = "%Y-%m-%d";

// Day keys are compared lexically all over, so only the canonical
// zero-padded form is accepted.
fn parse(date: &str, label: &str) -> Result<NaiveDate, CliError> {
    let s = date.trim();
    if s.len() != 10 {
        return Err(CliError::validation(format!("Invalid {}: {}", label, date)));
    }
    NaiveDate::parse_from_str(s, DAY_FMT)
        .map_err(|_| CliError::validation(format!("Invalid {}: {}", label, date)))
}

fn fmt(date: NaiveDate) -> String {
    date.format(DAY_FMT).to_string()
}

pub fn parse_date_string(s: &str, label: &str) -> Result<(), CliError> {
    let _ = parse(s, label)?;
    Ok(())
}

/// Weekday number: Sun=0..Sat=6.
pub fn weekday(date: &str) -> Result<u8, CliError> {
    let d = parse(date, "date")?;
    Ok(d.weekday().num_days_from_sunday() as u8)
}

pub fn add_days(date: &str, delta_days: i64) -> Result<String, CliError> {
    let d = parse(date, "date")?;
    d.checked_add_signed(chrono::Duration::days(delta_days))
        .map(fmt)
        .ok_or_else(|| CliError::validation(format!("Date out of range: {}", date)))
}

pub fn date_range_inclusive(from: &str, to: &str) -> Result<Vec<String>, CliError> {
    let from_d = parse(from, "from")?;
    let to_d = parse(to, "to")?;
    if from_d > to_d {
        return Err(CliError::validation("Invalid range: from > to"));
    }

    let mut out = Vec::new();
    let mut cur = from_d;
    while cur <= to_d {
        out.push(fmt(cur));
        cur = match cur.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    Ok(out)
}

pub fn system_today() -> String {
    fmt(Local::now().date_naive())
}

/// Wall-clock instant at minute granularity, for reminder arming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub date: String,
    pub minutes_since_midnight: u32,
}

pub fn clock_from_rfc3339(ts: &str, label: &str) -> Result<Clock, CliError> {
    let t = ts.trim();
    if t.is_empty() {
        return Err(CliError::validation(format!("Invalid {}: (empty)", label)));
    }
    let dt = chrono::DateTime::parse_from_rfc3339(t)
        .map_err(|_| CliError::validation(format!("Invalid {}: {}", label, ts)))?;
    Ok(Clock {
        date: fmt(dt.date_naive()),
        minutes_since_midnight: dt.hour() * 60 + dt.minute(),
    })
}

pub fn system_clock() -> Clock {
    let now = Local::now();
    Clock {
        date: fmt(now.date_naive()),
        minutes_since_midnight: now.hour() * 60 + now.minute(),
    }
}
