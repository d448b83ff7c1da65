// =============================================================================
// TWSE REST Client — daily trading history (STOCK_DAY)
// =============================================================================
//
// The exchange publishes one calendar month of daily bars per request:
//
//   GET {base}/exchangeReport/STOCK_DAY?response=json&date=YYYYMM01&stockNo=2330
//
//   { "stat": "OK", "title": "...", "fields": [...], "data": [[...], ...] }
//
// Rows come back exactly as the normalizer expects them (strings, ROC dates,
// thousands separators). This client only moves bytes: no retries, no rate
// limiting and no caching.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::RawRow;

/// Status string the exchange returns on success.
const STAT_OK: &str = "OK";

/// The exchange rejects requests without a browser-like User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// One STOCK_DAY page.
#[derive(Debug, Clone, Deserialize)]
pub struct StockDayResponse {
    pub stat: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub data: Vec<RawRow>,
}

impl StockDayResponse {
    pub fn is_ok(&self) -> bool {
        self.stat == STAT_OK
    }
}

/// Concatenated raw history across several monthly pages, oldest first.
#[derive(Debug, Clone, Default)]
pub struct DailyHistory {
    pub stock_code: String,
    pub title: String,
    pub rows: Vec<RawRow>,
}

/// Client for the exchange's public JSON endpoints.
#[derive(Clone)]
pub struct TwseClient {
    base_url: String,
    client: reqwest::Client,
}

impl TwseClient {
    /// Create a client against `base_url` (e.g. `https://www.twse.com.tw`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "TwseClient initialised");

        Ok(Self { base_url, client })
    }

    /// GET one month of daily bars. `month` may be any day of the month.
    #[instrument(skip(self), name = "twse::fetch_month")]
    pub async fn fetch_month(&self, stock_code: &str, month: NaiveDate) -> Result<StockDayResponse> {
        let url = format!("{}/exchangeReport/STOCK_DAY", self.base_url);
        let date = format!("{:04}{:02}01", month.year(), month.month());

        let resp = self
            .client
            .get(&url)
            .query(&[("response", "json"), ("date", date.as_str()), ("stockNo", stock_code)])
            .send()
            .await
            .context("GET STOCK_DAY request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("TWSE STOCK_DAY returned HTTP {status}");
        }

        let body: StockDayResponse = resp
            .json()
            .await
            .context("failed to parse STOCK_DAY response")?;

        debug!(stat = %body.stat, rows = body.data.len(), "STOCK_DAY page received");
        Ok(body)
    }

    /// Fetch `months` consecutive calendar months ending with the month of
    /// `today`, oldest first.
    ///
    /// Months the exchange has no data for (not yet listed, no trading yet
    /// this month) are skipped with a warning. Fails only when every month
    /// fails.
    #[instrument(skip(self), name = "twse::fetch_history")]
    pub async fn fetch_history(
        &self,
        stock_code: &str,
        months: u32,
        today: NaiveDate,
    ) -> Result<DailyHistory> {
        let mut history = DailyHistory {
            stock_code: stock_code.to_string(),
            ..DailyHistory::default()
        };
        let mut last_error: Option<anyhow::Error> = None;
        let mut pages_ok = 0usize;

        for month in month_starts(today, months) {
            match self.fetch_month(stock_code, month).await {
                Ok(page) if page.is_ok() => {
                    pages_ok += 1;
                    if !page.title.is_empty() {
                        history.title = page.title;
                    }
                    history.rows.extend(page.data);
                }
                Ok(page) => {
                    warn!(stock_code, month = %month, stat = %page.stat, "no data for month");
                    last_error = Some(anyhow::anyhow!(
                        "no such stock or data not yet published: {}",
                        page.stat
                    ));
                }
                Err(e) => {
                    warn!(stock_code, month = %month, error = %e, "month fetch failed");
                    last_error = Some(e);
                }
            }
        }

        if pages_ok == 0 {
            return Err(last_error
                .unwrap_or_else(|| anyhow::anyhow!("no months requested"))
                .context(format!("failed to fetch history for {stock_code}")));
        }

        Ok(history)
    }
}

/// First day of each of the `months` calendar months ending with `today`'s
/// month, oldest first.
pub fn month_starts(today: NaiveDate, months: u32) -> Vec<NaiveDate> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// Stock codes are short alphanumeric tickers (e.g. `2330`, `00878`, `2881A`).
pub fn is_valid_stock_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 10 && code.chars().all(|c| c.is_ascii_alphanumeric())
}
