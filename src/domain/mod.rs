// Domain types and value objects
mod candle;
mod indicator;
mod instrument;
mod purchase;
mod timeframe;

// Re-export commonly used types to the world
pub use candle::{Candle, CandleType, TimePoint};
pub use indicator::{
    IndicatorBundle, IndicatorData, IndicatorKind, IndicatorPoint, IndicatorSeries, OverlayKey,
};
pub use instrument::{Instrument, InstrumentId};
pub use purchase::{LotId, NewPurchaseLot, PurchaseLot, PurchaseLotPatch};
pub use timeframe::Timeframe;
