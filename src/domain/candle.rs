use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{Price, Quantity};

/// Session-resolution timestamp. Daily candles carry the session date, weekly
/// and monthly candles the date of the first session in the bucket.
pub type TimePoint = NaiveDate;

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

// One OHLCV data point for a trading session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: TimePoint,

    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,

    pub volume: Quantity,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        time: TimePoint,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Candle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A flat session counts as bullish
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }
}
