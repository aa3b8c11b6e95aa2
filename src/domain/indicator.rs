use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::Price;
use crate::domain::TimePoint;

/// Indicator families the provider may precompute.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndicatorKind {
    Sma25,
    Sma50,
    Sma75,
    Ema,
    Bollinger,
}

impl IndicatorKind {
    /// Surface series keys owned by this kind. Bollinger owns three keys
    /// that are always attached and detached together.
    pub fn overlay_keys(&self) -> &'static [OverlayKey] {
        match self {
            Self::Sma25 => &[OverlayKey::Sma25],
            Self::Sma50 => &[OverlayKey::Sma50],
            Self::Sma75 => &[OverlayKey::Sma75],
            Self::Ema => &[OverlayKey::Ema],
            Self::Bollinger => &[OverlayKey::BbUpper, OverlayKey::BbMiddle, OverlayKey::BbLower],
        }
    }

    /// Look-back period the provider uses for this kind.
    pub fn default_period(&self) -> u32 {
        match self {
            Self::Sma25 => 25,
            Self::Sma50 => 50,
            Self::Sma75 => 75,
            Self::Ema => 12,
            Self::Bollinger => 20,
        }
    }
}

/// Name of one overlay series attached to the rendering surface.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverlayKey {
    Sma25,
    Sma50,
    Sma75,
    Ema,
    BbUpper,
    BbMiddle,
    BbLower,
}

impl OverlayKey {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            Self::Sma25 => IndicatorKind::Sma25,
            Self::Sma50 => IndicatorKind::Sma50,
            Self::Sma75 => IndicatorKind::Sma75,
            Self::Ema => IndicatorKind::Ema,
            Self::BbUpper | Self::BbMiddle | Self::BbLower => IndicatorKind::Bollinger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: TimePoint,
    pub value: Price,
}

/// Ordered indicator values. May be shorter than the candle series
/// (warm-up exclusion); every time is also a candle time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn new(points: Vec<IndicatorPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Data for one indicator kind.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorData {
    Line(IndicatorSeries),
    Bands {
        upper: IndicatorSeries,
        middle: IndicatorSeries,
        lower: IndicatorSeries,
    },
}

impl IndicatorData {
    fn series(&self, key: OverlayKey) -> Option<&IndicatorSeries> {
        match (self, key) {
            (Self::Bands { upper, .. }, OverlayKey::BbUpper) => Some(upper),
            (Self::Bands { middle, .. }, OverlayKey::BbMiddle) => Some(middle),
            (Self::Bands { lower, .. }, OverlayKey::BbLower) => Some(lower),
            (Self::Line(series), k) if !matches!(k.kind(), IndicatorKind::Bollinger) => Some(series),
            _ => None,
        }
    }

    pub(crate) fn all_series(&self) -> Vec<&IndicatorSeries> {
        match self {
            Self::Line(series) => vec![series],
            Self::Bands {
                upper,
                middle,
                lower,
            } => vec![upper, middle, lower],
        }
    }
}

/// Precomputed indicators supplied with a candle dataset. Read-only to the
/// engine; absence of a kind means "not available".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorBundle {
    entries: BTreeMap<IndicatorKind, IndicatorData>,
}

impl IndicatorBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: IndicatorKind, data: IndicatorData) {
        self.entries.insert(kind, data);
    }

    /// Builder-style insert of a single-line kind.
    pub fn with_line(mut self, kind: IndicatorKind, series: IndicatorSeries) -> Self {
        self.insert(kind, IndicatorData::Line(series));
        self
    }

    /// Builder-style insert of the three Bollinger bands.
    pub fn with_bands(
        mut self,
        upper: IndicatorSeries,
        middle: IndicatorSeries,
        lower: IndicatorSeries,
    ) -> Self {
        self.insert(
            IndicatorKind::Bollinger,
            IndicatorData::Bands {
                upper,
                middle,
                lower,
            },
        );
        self
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&IndicatorData> {
        self.entries.get(&kind)
    }

    /// Series pushed into the surface series named `key`.
    pub fn series_for(&self, key: OverlayKey) -> Option<&IndicatorSeries> {
        self.entries.get(&key.kind()).and_then(|d| d.series(key))
    }

    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndicatorKind, &IndicatorData)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
