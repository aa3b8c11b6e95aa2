//! Provider payload and the validated dataset built from it.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Candle, IndicatorBundle, IndicatorData, IndicatorKind, IndicatorSeries, Timeframe,
};
use crate::error::LoadError;

/// Wire shape of the chart endpoint. Every indicator key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartResponse {
    pub symbol: String,
    pub data: Vec<Candle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma25: Option<IndicatorSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma50: Option<IndicatorSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma75: Option<IndicatorSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema: Option<IndicatorSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BollingerResponse {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Candles plus their precomputed indicators for one (symbol, timeframe).
/// Replaced wholesale on every successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
    pub indicators: IndicatorBundle,
}

impl ChartDataset {
    /// Validate and build. Candle times must be strictly ascending and every
    /// indicator point must sit on a candle time.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
        indicators: IndicatorBundle,
    ) -> Result<Self, LoadError> {
        let symbol = symbol.into();
        let invalid = |reason: String| LoadError::InvalidDataset {
            symbol: symbol.clone(),
            reason,
        };

        if let Some(w) = candles.windows(2).find(|w| w[0].time >= w[1].time) {
            return Err(invalid(format!(
                "candle times not strictly ascending at {} -> {}",
                w[0].time, w[1].time
            )));
        }

        for (kind, data) in indicators.iter() {
            for series in data.all_series() {
                if let Some(p) = series
                    .points
                    .iter()
                    .find(|p| candles.binary_search_by_key(&p.time, |c| c.time).is_err())
                {
                    return Err(invalid(format!("{} point at {} has no candle", kind, p.time)));
                }
            }
        }

        Ok(Self {
            symbol,
            timeframe,
            candles,
            indicators,
        })
    }

    pub fn from_response(response: ChartResponse, timeframe: Timeframe) -> Result<Self, LoadError> {
        let mut bundle = IndicatorBundle::new();
        let lines = [
            (IndicatorKind::Sma25, response.sma25),
            (IndicatorKind::Sma50, response.sma50),
            (IndicatorKind::Sma75, response.sma75),
            (IndicatorKind::Ema, response.ema),
        ];
        for (kind, series) in lines {
            if let Some(series) = series {
                bundle.insert(kind, IndicatorData::Line(series));
            }
        }
        if let Some(bb) = response.bollinger {
            bundle = bundle.with_bands(bb.upper, bb.middle, bb.lower);
        }

        Self::new(response.symbol, timeframe, response.data, bundle)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
