//! CSV ingest and normalization.
//!
//! This module turns a raw weather export into a clean, date-keyed set of
//! `(date, temperature, humidity)` observations.
//!
//! Exports typically start with a free-form metadata preamble, so the real
//! header is located by its leading token rather than assumed to be line 1.
//! The date can arrive in several encodings; see `DateStrategy` for the order
//! in which they are tried.
//!
//! Fatal problems (no header, no usable date encoding, missing measurement
//! columns) abort with a `NormalizeError`. Anything wrong with a single row
//! only degrades that row: a bad measurement becomes `None`, a bad date drops
//! the row.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{ColumnAlias, DateStrategy, Observation};
use crate::error::NormalizeError;

/// Leading tokens (upper-case) that mark the tabular header line.
const HEADER_TOKENS: [&str; 4] = ["DATE,", "YEAR,", "YYYYMMDD,", "LOCAL_DATE,"];

/// Generic date layouts accepted in a `DATE` column.
const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Date-time layouts accepted in a `DATE` column; the time part is discarded.
const DATETIME_FMTS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Normalizer output: observations plus what happened on the way.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Unique by date, ascending.
    pub observations: Vec<Observation>,
    /// Date encoding that was used.
    pub strategy: DateStrategy,
    /// 1-based line number of the detected header.
    pub header_line: usize,
    /// Data records after the header.
    pub rows_read: usize,
    /// Rows dropped because no date could be built.
    pub missing_dates: usize,
    /// Rows dropped because an earlier row already had the same date.
    pub duplicate_dates: usize,
}

/// Normalize raw export text into observations.
pub fn normalize(raw: &str) -> Result<Vec<Observation>, NormalizeError> {
    normalize_with_report(raw).map(|n| n.observations)
}

/// Normalize raw export text, keeping ingest counters for reporting.
pub fn normalize_with_report(raw: &str) -> Result<Normalized, NormalizeError> {
    let (header_idx, offset) = find_header(raw).ok_or(NormalizeError::MissingHeader)?;
    debug!(line = header_idx + 1, "found data header");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw[offset..].as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| NormalizeError::MissingHeader)?
        .clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping unreadable CSV record: {e}"),
        }
    }

    let date_source = resolve_date_source(&columns, records.first())?;
    let (t2m, rh2m) = match (columns.get(ColumnAlias::T2m), columns.get(ColumnAlias::Rh2m)) {
        (Some(t), Some(rh)) => (t, rh),
        _ => {
            return Err(NormalizeError::MissingColumns {
                available: columns.names.clone(),
            });
        }
    };
    debug!(strategy = date_source.strategy().display_name(), "resolved date encoding");

    let mut seen = HashSet::with_capacity(records.len());
    let mut observations = Vec::with_capacity(records.len());
    let mut missing_dates = 0usize;
    let mut duplicate_dates = 0usize;

    for record in &records {
        let Some(date) = date_source.date_for(record) else {
            missing_dates += 1;
            if let Some(pos) = record.position() {
                debug!(line = header_idx + pos.line() as usize, "dropping row without a usable date");
            }
            continue;
        };
        // First occurrence in file order wins.
        if !seen.insert(date) {
            duplicate_dates += 1;
            continue;
        }
        observations.push(Observation::new(
            date,
            parse_measurement(get_field(record, t2m)),
            parse_measurement(get_field(record, rh2m)),
        ));
    }

    observations.sort_by_key(|o| o.date);

    if missing_dates > 0 {
        warn!(rows = missing_dates, "dropped rows without a usable date");
    }
    if duplicate_dates > 0 {
        warn!(rows = duplicate_dates, "dropped rows with a duplicate date");
    }

    Ok(Normalized {
        observations,
        strategy: date_source.strategy(),
        header_line: header_idx + 1,
        rows_read: records.len(),
        missing_dates,
        duplicate_dates,
    })
}

/// Round to 2 decimals, half-to-even on the scaled value.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Returns `(line index, byte offset)` of the header line.
fn find_header(raw: &str) -> Option<(usize, usize)> {
    let mut offset = 0usize;
    for (idx, line) in raw.split_inclusive('\n').enumerate() {
        if is_header_line(line) {
            return Some((idx, offset));
        }
        offset += line.len();
    }
    None
}

fn is_header_line(line: &str) -> bool {
    let line = line.trim().trim_start_matches('\u{feff}').to_ascii_uppercase();
    HEADER_TOKENS.iter().any(|token| line.starts_with(token))
}

/// Header cells resolved to known aliases.
struct ColumnMap {
    by_alias: HashMap<ColumnAlias, usize>,
    names: Vec<String>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut by_alias = HashMap::new();
        let mut names = Vec::with_capacity(headers.len());
        for (idx, cell) in headers.iter().enumerate() {
            if let Some(alias) = ColumnAlias::from_header(cell) {
                by_alias.entry(alias).or_insert(idx);
            }
            names.push(cell.trim_start_matches('\u{feff}').trim().to_string());
        }
        Self { by_alias, names }
    }

    fn get(&self, alias: ColumnAlias) -> Option<usize> {
        self.by_alias.get(&alias).copied()
    }

    fn has(&self, alias: ColumnAlias) -> bool {
        self.by_alias.contains_key(&alias)
    }
}

/// A date strategy bound to concrete column indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSource {
    DateCompact(usize),
    DateGeneric(usize),
    Compact(usize),
    YearDayOfYear { year: usize, doy: usize },
    YearMonthDay { year: usize, month: usize, day: usize },
}

impl DateSource {
    fn strategy(self) -> DateStrategy {
        match self {
            DateSource::DateCompact(_) | DateSource::DateGeneric(_) => DateStrategy::DateColumn,
            DateSource::Compact(_) => DateStrategy::Compact,
            DateSource::YearDayOfYear { .. } => DateStrategy::YearDayOfYear,
            DateSource::YearMonthDay { .. } => DateStrategy::YearMonthDay,
        }
    }

    fn date_for(self, record: &StringRecord) -> Option<NaiveDate> {
        match self {
            DateSource::DateCompact(idx) | DateSource::Compact(idx) => parse_compact_date(get_field(record, idx)?),
            DateSource::DateGeneric(idx) => parse_generic_date(get_field(record, idx)?),
            DateSource::YearDayOfYear { year, doy } => {
                date_from_day_of_year(get_field(record, year)?, get_field(record, doy)?)
            }
            DateSource::YearMonthDay { year, month, day } => date_from_parts(
                get_field(record, year)?,
                get_field(record, month)?,
                get_field(record, day)?,
            ),
        }
    }
}

fn resolve_date_source(columns: &ColumnMap, first: Option<&StringRecord>) -> Result<DateSource, NormalizeError> {
    for strategy in DateStrategy::PRECEDENCE {
        if let Some(source) = bind_strategy(strategy, columns, first) {
            return Ok(source);
        }
    }

    let reason = if columns.has(ColumnAlias::Year) {
        "YEAR is present but DOY or MO/DY are missing"
    } else {
        "no DATE, YYYYMMDD or YEAR column"
    };
    Err(NormalizeError::DateReconstruction {
        reason: reason.to_string(),
        columns: columns.names.clone(),
    })
}

fn bind_strategy(strategy: DateStrategy, columns: &ColumnMap, first: Option<&StringRecord>) -> Option<DateSource> {
    match strategy {
        DateStrategy::DateColumn => {
            let idx = columns.get(ColumnAlias::Date)?;
            // The first data value decides the layout for the whole column.
            let compact = first
                .and_then(|r| r.get(idx))
                .map(|s| is_compact_date(s.trim()))
                .unwrap_or(false);
            Some(if compact {
                DateSource::DateCompact(idx)
            } else {
                DateSource::DateGeneric(idx)
            })
        }
        DateStrategy::Compact => columns.get(ColumnAlias::Yyyymmdd).map(DateSource::Compact),
        DateStrategy::YearDayOfYear => Some(DateSource::YearDayOfYear {
            year: columns.get(ColumnAlias::Year)?,
            doy: columns.get(ColumnAlias::Doy)?,
        }),
        DateStrategy::YearMonthDay => Some(DateSource::YearMonthDay {
            year: columns.get(ColumnAlias::Year)?,
            month: columns
                .get(ColumnAlias::Mo)
                .or_else(|| columns.get(ColumnAlias::Month))?,
            day: columns
                .get(ColumnAlias::Dy)
                .or_else(|| columns.get(ColumnAlias::Day))?,
        }),
    }
}

fn get_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn is_compact_date(s: &str) -> bool {
    s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if !is_compact_date(s) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic_date(s: &str) -> Option<NaiveDate> {
    if is_compact_date(s) {
        return parse_compact_date(s);
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// January 1 of `year` plus `doy - 1` days. Out-of-range days roll over.
fn date_from_day_of_year(year: &str, doy: &str) -> Option<NaiveDate> {
    let year = i32::try_from(parse_integer(year)?).ok()?;
    let offset = TimeDelta::try_days(parse_integer(doy)?.checked_sub(1)?)?;
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_signed(offset)
}

fn date_from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = i32::try_from(parse_integer(year)?).ok()?;
    let month = u32::try_from(parse_integer(month)?).ok()?;
    let day = u32::try_from(parse_integer(day)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Integers, also written as whole floats (`2024.0`).
fn parse_integer(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_measurement(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(round2(v)) } else { None }
}
