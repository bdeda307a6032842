//! SikaFinance CSV loader.
//!
//! One file per instrument with columns `d,o,h,l,c,v`. Only `d` and `c` are
//! required: missing open/high/low fall back to the close, missing volume to 0.
//! `d` is either an ISO date (`2024-03-01`) or a day offset from 1900-01-01,
//! which is how the SikaFinance export encodes it.
//!
//! The ticker comes from the file name: `SNTS.sn.csv` → `SNTS`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use brvm_core::domain::{PriceBar, PriceSeries, SeriesError, Symbol};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

const REQUIRED_COLUMNS: [&str; 2] = ["d", "c"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: row {row}: unrecognized date '{value}'", path.display())]
    InvalidDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{}: cannot derive a ticker from the file name", path.display())]
    NoTicker { path: PathBuf },

    #[error("{}: ticker {symbol} already loaded from another file", path.display())]
    DuplicateSymbol { path: PathBuf, symbol: Symbol },

    #[error("{}: {source}", path.display())]
    Series {
        path: PathBuf,
        #[source]
        source: SeriesError,
    },
}

/// One raw SikaFinance row.
#[derive(Debug, Deserialize)]
struct SikaRow {
    d: String,
    #[serde(default)]
    o: Option<f64>,
    #[serde(default)]
    h: Option<f64>,
    #[serde(default)]
    l: Option<f64>,
    c: Option<f64>,
    #[serde(default)]
    v: Option<f64>,
}

/// Everything read from a data directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Sorted by symbol.
    pub series: Vec<PriceSeries>,
    /// Files that could not be turned into a series.
    pub failures: Vec<LoadError>,
}

impl LoadReport {
    pub fn total_bars(&self) -> usize {
        self.series.iter().map(PriceSeries::len).sum()
    }

    /// Earliest and latest bar dates across all series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.series.iter().filter_map(|s| s.bars().first()).map(|b| b.date).min()?;
        let last = self.series.iter().filter_map(|s| s.last()).map(|b| b.date).max()?;
        Some((first, last))
    }
}

/// `SNTS.sn.csv` → `SNTS`.
pub fn ticker_from_path(path: &Path) -> Option<Symbol> {
    let name = path.file_name()?.to_str()?;
    let ticker = name.split('.').next()?.trim().to_uppercase();
    if ticker.is_empty() {
        None
    } else {
        Some(ticker)
    }
}

/// ISO date or integer day offset from 1900-01-01.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    let offset: f64 = value.parse().ok()?;
    if !offset.is_finite() || offset.fract() != 0.0 || offset < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    epoch.checked_add_days(chrono::Days::new(offset as u64))
}

/// Load one file into a validated series.
///
/// Rows are sorted by date and a repeated date keeps the last row. Rows with a
/// missing or non-positive close are skipped. Rows whose high/low do not
/// bracket open and close get their range widened.
pub fn load_file(path: &Path) -> Result<PriceSeries, LoadError> {
    let symbol = ticker_from_path(path).ok_or_else(|| LoadError::NoTicker {
        path: path.to_path_buf(),
    })?;
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut repaired = 0usize;
    for (index, row) in reader.deserialize::<SikaRow>().enumerate() {
        let row = row.map_err(csv_err)?;
        let date = parse_day(&row.d).ok_or_else(|| LoadError::InvalidDate {
            path: path.to_path_buf(),
            row: index + 1,
            value: row.d.clone(),
        })?;

        let close = match row.c {
            Some(c) if c.is_finite() && c > 0.0 => c,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let or_close = |p: Option<f64>| p.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(close);
        let volume = row
            .v
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(0, |v| v.round() as u64);

        let mut bar =
            PriceBar::new(date, or_close(row.o), or_close(row.h), or_close(row.l), close, volume);
        if !bar.is_sane() {
            widen_range(&mut bar);
            repaired += 1;
        }
        by_date.insert(date, bar);
    }

    if skipped > 0 {
        log::warn!("{symbol}: skipped {skipped} rows without a positive close");
    }
    if repaired > 0 {
        log::warn!("{symbol}: widened high/low on {repaired} rows with inconsistent OHLC");
    }

    PriceSeries::new(symbol, by_date.into_values().collect()).map_err(|source| LoadError::Series {
        path: path.to_path_buf(),
        source,
    })
}

/// Stretch high and low so they bracket open and close.
fn widen_range(bar: &mut PriceBar) {
    bar.high = bar.high.max(bar.open).max(bar.close).max(bar.low);
    bar.low = bar.low.min(bar.open).min(bar.close);
}

/// Load every `*.csv` file in `dir`.
///
/// A directory that cannot be listed is an error. A file that cannot be
/// loaded is recorded in [`LoadReport::failures`] and skipped.
pub fn load_dir(dir: &Path) -> Result<LoadReport, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    let mut report = LoadReport::default();
    let mut seen: BTreeMap<Symbol, PathBuf> = BTreeMap::new();
    for path in paths {
        match load_file(&path) {
            Ok(series) => {
                if seen.contains_key(series.symbol()) {
                    report.failures.push(LoadError::DuplicateSymbol {
                        path,
                        symbol: series.symbol().to_string(),
                    });
                    continue;
                }
                log::info!("{}: {} bars", series.symbol(), series.len());
                seen.insert(series.symbol().to_string(), path);
                report.series.push(series);
            }
            Err(err) => {
                log::warn!("{err}");
                report.failures.push(err);
            }
        }
    }
    report.series.sort_by(|a, b| a.symbol().cmp(b.symbol()));

    Ok(report)
}
