// =============================================================================
// Series Normalizer — raw exchange rows → typed PriceSeries
// =============================================================================
//
// Raw rows follow the exchange daily-history column order:
//
//   [date, volume, amount, open, high, low, close, (change), ...]
//
// Every cell is a string. Numbers may carry thousands separators ("1,234.5")
// and dates may use `/` or `-` and the ROC calendar ("113/01/02" = 2024-01-02).
//
// Policy is best-effort: a row that fails to parse is logged and dropped, the
// rest of the batch survives. Only an entirely empty result is an error.
// =============================================================================

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Error, Result, RowError};
use crate::market_data::series::{PriceBar, PriceSeries};

/// One raw upstream row, as delivered by the exchange JSON.
pub type RawRow = Vec<String>;

/// Offset between ROC (Minguo) years and Gregorian years.
const ROC_YEAR_OFFSET: i32 = 1911;

// Column positions in the upstream row.
const COL_DATE: usize = 0;
const COL_VOLUME: usize = 1;
const COL_OPEN: usize = 3;
const COL_HIGH: usize = 4;
const COL_LOW: usize = 5;
const COL_CLOSE: usize = 6;

/// Minimum number of columns a row must carry (change column optional).
pub const MIN_COLUMNS: usize = COL_CLOSE + 1;

/// Parse and clean a batch of raw rows into a [`PriceSeries`].
///
/// Malformed rows are dropped. The surviving rows are sorted ascending by
/// date; a repeated date keeps its last occurrence.
///
/// # Errors
/// [`Error::InsufficientData`] when no row survives parsing.
pub fn normalize_rows<R, S>(rows: &[R]) -> Result<PriceSeries>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut bars = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        match parse_row(row.as_ref()) {
            Ok(bar) => bars.push(bar),
            Err(e) => {
                dropped += 1;
                debug!(row = idx, error = %e, "dropping malformed row");
            }
        }
    }

    if dropped > 0 {
        warn!(dropped, kept = bars.len(), "some raw rows could not be parsed");
    }

    if bars.is_empty() {
        return Err(Error::InsufficientData { rows: rows.len() });
    }

    Ok(PriceSeries::new(bars))
}

/// Parse a single raw row into a [`PriceBar`].
///
/// Required fields: date, volume, open, high, low, close. The amount and
/// change columns are not inspected.
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> std::result::Result<PriceBar, RowError> {
    if row.len() < MIN_COLUMNS {
        return Err(RowError::MissingColumns {
            expected: MIN_COLUMNS,
            actual: row.len(),
        });
    }

    Ok(PriceBar {
        date: parse_date(row[COL_DATE].as_ref())?,
        volume: parse_number(row[COL_VOLUME].as_ref(), "volume")?,
        open: parse_number(row[COL_OPEN].as_ref(), "open")?,
        high: parse_number(row[COL_HIGH].as_ref(), "high")?,
        low: parse_number(row[COL_LOW].as_ref(), "low")?,
        close: parse_number(row[COL_CLOSE].as_ref(), "close")?,
    })
}

/// Parse `Y/M/D` or `Y-M-D`. Years of at most three digits are ROC years.
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, RowError> {
    let bad = || RowError::BadDate(raw.to_string());

    let trimmed = raw.trim();
    let mut parts = trimmed.split(['/', '-']);
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };

    let mut year: i32 = y.trim().parse().map_err(|_| bad())?;
    let month: u32 = m.trim().parse().map_err(|_| bad())?;
    let day: u32 = d.trim().parse().map_err(|_| bad())?;

    if y.trim().len() <= 3 {
        year += ROC_YEAR_OFFSET;
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Parse a decimal that may contain thousands separators.
pub fn parse_number(raw: &str, field: &'static str) -> std::result::Result<f64, RowError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowError::BadNumber {
            field,
            value: raw.to_string(),
        }),
    }
}
