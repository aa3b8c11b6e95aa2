//! Local peak/valley detection over a candle series.
//!
//! A candle at index `i` is a peak when every other candle in `[i-w, i+w]`
//! has a strictly lower high, and a valley when every other candle in the same
//! window has a strictly higher low. Ties disqualify both candles. Only
//! interior indices (`w <= i < len - w`) are considered, so a series shorter
//! than `2w + 1` yields nothing.

use serde::{Deserialize, Serialize};

use crate::config::Price;
use crate::domain::{Candle, TimePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremumKind {
    Peak,
    Valley,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremumPoint {
    pub time: TimePoint,
    pub price: Price,
    pub kind: ExtremumKind,
}

/// Peaks and valleys, each ascending by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub peaks: Vec<ExtremumPoint>,
    pub valleys: Vec<ExtremumPoint>,
}

impl Extrema {
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.valleys.is_empty()
    }
}

pub fn detect_extrema(candles: &[Candle], window: usize) -> Extrema {
    crate::trace_time!("Extrema scan", 2000, {
        let extrema = Extrema {
            peaks: detect_peaks(candles, window),
            valleys: detect_valleys(candles, window),
        };

        if extrema.is_empty() {
            match span(window) {
                Some(needed) if candles.len() < needed => log::debug!(
                    "Extrema: {} candles is below the {} needed for window {}",
                    candles.len(),
                    needed,
                    window
                ),
                None => log::debug!("Extrema: window {} is too large", window),
                _ => {}
            }
        }
        extrema
    })
}

pub fn detect_peaks(candles: &[Candle], window: usize) -> Vec<ExtremumPoint> {
    scan(candles, window, |other, current| other.high >= current.high)
        .map(|c| ExtremumPoint {
            time: c.time,
            price: c.high,
            kind: ExtremumKind::Peak,
        })
        .collect()
}

pub fn detect_valleys(candles: &[Candle], window: usize) -> Vec<ExtremumPoint> {
    scan(candles, window, |other, current| other.low <= current.low)
        .map(|c| ExtremumPoint {
            time: c.time,
            price: c.low,
            kind: ExtremumKind::Valley,
        })
        .collect()
}

/// Candles covered by one window, `2w + 1`. `None` on overflow.
fn span(window: usize) -> Option<usize> {
    window.checked_mul(2).and_then(|n| n.checked_add(1))
}

/// Yields interior candles for which no other candle in the window satisfies
/// `disqualifies(other, current)`.
fn scan<'a, F>(candles: &'a [Candle], window: usize, disqualifies: F) -> impl Iterator<Item = &'a Candle> + 'a
where
    F: Fn(&Candle, &Candle) -> bool + 'a,
{
    let len = candles.len();
    let interior = match span(window) {
        Some(needed) if len >= needed => window..len - window,
        _ => 0..0,
    };

    interior.filter_map(move |i| {
        let current = &candles[i];
        let beaten = (i - window..=i + window)
            .filter(|&j| j != i)
            .any(|j| disqualifies(&candles[j], current));
        (!beaten).then_some(current)
    })
}
