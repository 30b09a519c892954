use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Ticker {
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub bid_volume: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub ask_volume: Option<Decimal>,
    pub vwap: Option<Decimal>,
    pub open: Option<Decimal>,
    pub close: Option<Decimal>,
    pub last: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub change: Option<Decimal>,
    /// Percent, not ratio: `1.5` means 1.5%.
    pub percentage: Option<Decimal>,
    pub average: Option<Decimal>,
    pub base_volume: Option<Decimal>,
    pub quote_volume: Option<Decimal>,
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

impl Ticker {
    /// Compute derived fields from whatever operands were reported.
    ///
    /// A derived field is only filled when it is unset and every operand
    /// it needs is present. Reported values are never overwritten.
    pub fn derive(mut self) -> Self {
        if self.vwap.is_none() {
            if let (Some(base), Some(quote)) = (self.base_volume, self.quote_volume) {
                if !base.is_zero() {
                    self.vwap = quote.checked_div(base);
                }
            }
        }

        if self.last.is_none() {
            self.last = self.close;
        }
        if self.close.is_none() {
            self.close = self.last;
        }

        match (self.last, self.open) {
            (Some(last), Some(open)) => {
                if self.change.is_none() {
                    self.change = last.checked_sub(open);
                }
                if self.average.is_none() {
                    self.average = last.checked_add(open).and_then(|s| s.checked_div(Decimal::TWO));
                }
            }
            (Some(last), None) => {
                if let Some(change) = self.change {
                    self.open = last.checked_sub(change);
                } else if let Some(pct) = self.percentage {
                    // open = last / (1 + pct/100)
                    let ratio = pct.checked_div(HUNDRED).and_then(|r| r.checked_add(Decimal::ONE));
                    if let Some(ratio) = ratio.filter(|r| !r.is_zero()) {
                        self.open = last.checked_div(ratio);
                    }
                }
                if let (Some(open), None) = (self.open, self.change) {
                    self.change = last.checked_sub(open);
                }
                if let (Some(open), None) = (self.open, self.average) {
                    self.average = last.checked_add(open).and_then(|s| s.checked_div(Decimal::TWO));
                }
            }
            _ => {}
        }

        if let (Some(change), Some(open)) = (self.change, self.open) {
            if self.percentage.is_none() && open > Decimal::ZERO {
                self.percentage = change
                    .checked_div(open)
                    .and_then(|r| r.checked_mul(HUNDRED));
            }
        }
        if let (Some(pct), Some(open), None) = (self.percentage, self.open, self.change) {
            self.change = pct.checked_mul(open).and_then(|v| v.checked_div(HUNDRED));
        }
        self
    }
}
