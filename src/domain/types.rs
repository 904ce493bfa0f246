//! Shared domain types.
//!
//! `Observation` is the one record shape that flows through the whole system:
//! built by the normalizer, appended to the store by the loader, and read back
//! by the analyzer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One normalized daily reading.
///
/// Serialized field names match the `public.lecturas` columns so CSV exports
/// line up with the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// Air temperature at 2m, °C, rounded to 2 decimals.
    #[serde(rename = "t2m")]
    pub temperature: Option<f64>,
    /// Relative humidity at 2m, %, rounded to 2 decimals.
    #[serde(rename = "rh2m")]
    pub humidity: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, temperature: Option<f64>, humidity: Option<f64>) -> Self {
        Self {
            date,
            temperature,
            humidity,
        }
    }
}

/// Export column names the normalizer understands.
///
/// Header cells are matched case-insensitively against `header_name()`; any
/// other column is carried along only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnAlias {
    Date,
    Yyyymmdd,
    Year,
    Doy,
    Mo,
    Month,
    Dy,
    Day,
    T2m,
    Rh2m,
}

impl ColumnAlias {
    pub const ALL: [ColumnAlias; 10] = [
        ColumnAlias::Date,
        ColumnAlias::Yyyymmdd,
        ColumnAlias::Year,
        ColumnAlias::Doy,
        ColumnAlias::Mo,
        ColumnAlias::Month,
        ColumnAlias::Dy,
        ColumnAlias::Day,
        ColumnAlias::T2m,
        ColumnAlias::Rh2m,
    ];

    /// Upper-case header spelling.
    pub fn header_name(self) -> &'static str {
        match self {
            ColumnAlias::Date => "DATE",
            ColumnAlias::Yyyymmdd => "YYYYMMDD",
            ColumnAlias::Year => "YEAR",
            ColumnAlias::Doy => "DOY",
            ColumnAlias::Mo => "MO",
            ColumnAlias::Month => "MONTH",
            ColumnAlias::Dy => "DY",
            ColumnAlias::Day => "DAY",
            ColumnAlias::T2m => "T2M",
            ColumnAlias::Rh2m => "RH2M",
        }
    }

    /// Match a raw header cell. Surrounding whitespace and a UTF-8 BOM are ignored.
    pub fn from_header(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('\u{feff}').trim();
        Self::ALL
            .into_iter()
            .find(|alias| name.eq_ignore_ascii_case(alias.header_name()))
    }
}

/// Supported date encodings, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// `DATE` column: `YYYYMMDD` when the first value is 8 digits, otherwise a
    /// generic date string.
    DateColumn,
    /// `YYYYMMDD` column.
    Compact,
    /// `YEAR` + `DOY`.
    YearDayOfYear,
    /// `YEAR` + `MO`/`MONTH` + `DY`/`DAY`.
    YearMonthDay,
}

impl DateStrategy {
    /// First match wins.
    pub const PRECEDENCE: [DateStrategy; 4] = [
        DateStrategy::DateColumn,
        DateStrategy::Compact,
        DateStrategy::YearDayOfYear,
        DateStrategy::YearMonthDay,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            DateStrategy::DateColumn => "DATE",
            DateStrategy::Compact => "YYYYMMDD",
            DateStrategy::YearDayOfYear => "YEAR+DOY",
            DateStrategy::YearMonthDay => "YEAR+MO+DY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_matching_ignores_case_whitespace_and_bom() {
        assert_eq!(ColumnAlias::from_header("t2m"), Some(ColumnAlias::T2m));
        assert_eq!(ColumnAlias::from_header(" Rh2M "), Some(ColumnAlias::Rh2m));
        assert_eq!(ColumnAlias::from_header("\u{feff}YEAR"), Some(ColumnAlias::Year));
        assert_eq!(ColumnAlias::from_header("Month"), Some(ColumnAlias::Month));
        assert_eq!(ColumnAlias::from_header("PRECTOTCORR"), None);
    }
}
