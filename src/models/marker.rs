use strum_macros::Display;

use crate::config::Rgba;
use crate::domain::TimePoint;

/// Vertical placement relative to the candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MarkerBand {
    Above,
    Below,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
    Circle,
}

/// Point annotation drawn on the candle series.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub time: TimePoint,
    pub band: MarkerBand,
    pub color: Rgba,
    pub shape: MarkerShape,
    pub label: Option<String>,
}
