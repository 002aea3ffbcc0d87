//! CSV file data adapter.
//!
//! Reads a headered CSV with a timestamp column (`Datetime`, `Date`,
//! `Timestamp` or `Time`), `Close` and `Volume`, matched case-insensitively.
//! Other columns are ignored. Row numbers in errors are zero-based data rows.

use crate::domain::bar::{Bar, validate_series};
use crate::domain::error::BandtraderError;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_HEADERS: [&str; 4] = ["datetime", "date", "timestamp", "time"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct Columns {
    timestamp: usize,
    close: usize,
    volume: usize,
}

fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, BandtraderError> {
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
    };
    let missing = |field: &str| BandtraderError::data(0, field, "column not found in header");

    Ok(Columns {
        timestamp: find(&TIMESTAMP_HEADERS).ok_or_else(|| missing("timestamp"))?,
        close: find(&["close"]).ok_or_else(|| missing("close"))?,
        volume: find(&["volume"]).ok_or_else(|| missing("volume"))?,
    })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`, the same with a `T`
/// separator, and any of those with a UTC offset (converted to UTC).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    row: usize,
    name: &str,
) -> Result<&'a str, BandtraderError> {
    match record.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BandtraderError::data(row, name, "missing value")),
    }
}

fn parse_number(raw: &str, row: usize, name: &str) -> Result<f64, BandtraderError> {
    raw.parse::<f64>()
        .map_err(|_| BandtraderError::data(row, name, format!("not a number: '{raw}'")))
}

pub fn parse_bars(content: &str) -> Result<Vec<Bar>, BandtraderError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| BandtraderError::data(0, "header", format!("CSV parse error: {e}")))?
        .clone();
    let columns = locate_columns(&headers)?;

    let mut bars = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result
            .map_err(|e| BandtraderError::data(row, "record", format!("CSV parse error: {e}")))?;

        let ts_raw = field(&record, columns.timestamp, row, "timestamp")?;
        let timestamp = parse_timestamp(ts_raw).ok_or_else(|| {
            BandtraderError::data(row, "timestamp", format!("unrecognised timestamp: '{ts_raw}'"))
        })?;
        let close = parse_number(field(&record, columns.close, row, "close")?, row, "close")?;
        let volume = parse_number(field(&record, columns.volume, row, "volume")?, row, "volume")?;

        bars.push(Bar::new(timestamp, close, volume));
    }

    validate_series(&bars)?;
    Ok(bars)
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError> {
        let content = fs::read_to_string(&self.path)?;
        parse_bars(&content)
    }
}

/// Write the equity curve as `trade,balance`, trades numbered from 1.
pub fn write_equity_csv<P: AsRef<Path>>(
    path: P,
    equity_curve: &[f64],
) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(std::io::Error::other)?;
    wtr.write_record(["trade", "balance"])
        .map_err(std::io::Error::other)?;
    for (i, balance) in equity_curve.iter().enumerate() {
        wtr.write_record([(i + 1).to_string(), balance.to_string()])
            .map_err(std::io::Error::other)?;
    }
    wtr.flush()?;
    Ok(())
}
