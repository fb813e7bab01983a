//! Scan report rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::result::{ScanResult, SkippedTicker};

const RULE_WIDTH: usize = 60;

/// Outcome of one scan pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub profile: String,
    pub universe: String,
    pub generated_at: DateTime<Utc>,
    /// Tickers attempted
    pub scanned: usize,
    /// Every scored ticker, passing or not
    pub results: Vec<ScanResult>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanReport {
    /// Results that met the profile's pass rule.
    pub fn candidates(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.passed)
    }

    /// Stable sort, highest reward/risk first; rows without levels last.
    pub fn sort_by_reward_risk(&mut self) {
        self.results.sort_by(|a, b| rr(b).cmp(&rr(a)));

        fn rr(r: &ScanResult) -> Option<rust_decimal::Decimal> {
            r.levels.map(|l| l.reward_risk)
        }
    }

    /// Fixed-width text report. `show_all` includes rows that did not pass.
    pub fn summary(&self, show_all: bool) -> String {
        let rows: Vec<&ScanResult> = if show_all {
            self.results.iter().collect()
        } else {
            self.candidates().collect()
        };

        let mut s = String::new();
        let heavy = "═".repeat(RULE_WIDTH);
        let light = "─".repeat(RULE_WIDTH);

        s.push_str(&heavy);
        s.push('\n');
        s.push_str(&format!(
            "  SCAN: {}   UNIVERSE: {}\n",
            self.profile.to_uppercase(),
            self.universe
        ));
        s.push_str(&format!(
            "  {}   scanned {}  scored {}  candidates {}  skipped {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
            self.scanned,
            self.results.len(),
            self.candidates().count(),
            self.skipped.len()
        ));
        s.push_str(&heavy);
        s.push_str("\n\n");

        if rows.is_empty() {
            s.push_str("  No candidates matched the screening criteria.\n\n");
        } else {
            let table = Table::for_rows(&rows);
            s.push_str(&table.header());
            s.push('\n');
            s.push_str(&"─".repeat(table.width()));
            s.push('\n');
            for row in &rows {
                s.push_str(&table.row(row));
                s.push('\n');
            }
            s.push('\n');
        }

        if !self.skipped.is_empty() {
            s.push_str("SKIPPED\n");
            s.push_str(&light);
            s.push('\n');
            for skipped in &self.skipped {
                s.push_str(&format!("  {:<14} {}\n", skipped.ticker, skipped.reason));
            }
            s.push('\n');
        }

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Column set chosen from what the rows carry.
struct Table {
    show_all: bool,
    fundamentals: bool,
    pcr: bool,
    levels: bool,
}

impl Table {
    fn for_rows(rows: &[&ScanResult]) -> Self {
        Self {
            show_all: rows.iter().any(|r| !r.passed),
            fundamentals: rows.iter().any(|r| r.fundamentals.is_some()),
            pcr: rows.iter().any(|r| r.put_call_ratio.is_some()),
            levels: rows.iter().any(|r| r.levels.is_some()),
        }
    }

    fn header(&self) -> String {
        let mut h = format!(
            "{:<14} {:>10} {:>7} {:>3} {:>3} {:>6} {:>8} {:>8} {:>10} {:>10} {:>8}",
            "Ticker", "Close", "Chg%", "T", "F", "RSI", "MACD", "Signal", "SMA20", "SMA50", "ATR"
        );
        if self.fundamentals {
            h.push_str(&format!(" {:>7} {:>6} {:>6} {:>7} {:>7}", "P/E", "P/B", "D/E", "ROE%", "EPSg%"));
        }
        if self.pcr {
            h.push_str(&format!(" {:>5}", "PCR"));
        }
        if self.levels {
            h.push_str(&format!(" {:>10} {:>10} {:>10} {:>5}", "Buy", "Stop", "Target", "R/R"));
        }
        if self.show_all {
            h.push_str("  Pass");
        }
        h
    }

    fn width(&self) -> usize {
        self.header().chars().count()
    }

    fn row(&self, r: &ScanResult) -> String {
        let ind = &r.indicators;
        let mut line = format!(
            "{:<14} {:>10.2} {:>7} {:>3} {:>3} {:>6} {:>8} {:>8} {:>10} {:>10} {:>8}",
            r.ticker.as_str(),
            r.close,
            fmt_opt(ind.window_change_pct, 2),
            r.scores.technical,
            r.scores.fundamental,
            fmt_opt(ind.rsi, 1),
            fmt_opt(ind.macd.map(|m| m.macd), 2),
            fmt_opt(ind.macd.map(|m| m.signal), 2),
            fmt_opt(ind.sma_20, 2),
            fmt_opt(ind.sma_50, 2),
            fmt_opt(ind.atr, 2),
        );
        if self.fundamentals {
            let f = r.fundamentals.unwrap_or_default();
            line.push_str(&format!(
                " {:>7} {:>6} {:>6} {:>7} {:>7}",
                fmt_opt(f.trailing_pe, 1),
                fmt_opt(f.price_to_book, 2),
                fmt_opt(f.debt_to_equity, 2),
                fmt_opt(f.return_on_equity.map(|v| v * 100.0), 1),
                fmt_opt(f.earnings_growth.map(|v| v * 100.0), 1),
            ));
        }
        if self.pcr {
            line.push_str(&format!(" {:>5}", fmt_opt(r.put_call_ratio, 2)));
        }
        if self.levels {
            match &r.levels {
                Some(l) => line.push_str(&format!(
                    " {:>10} {:>10} {:>10} {:>5}",
                    l.buy, l.stop_loss, l.target, l.reward_risk
                )),
                None => line.push_str(&format!(" {:>10} {:>10} {:>10} {:>5}", "-", "-", "-", "-")),
            }
        }
        if self.show_all {
            line.push_str(if r.passed { "  yes" } else { "  no" });
        }
        line
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "-".to_string(),
    }
}
