mod extrema;
mod purchase_markers;

pub use extrema::{Extrema, ExtremumKind, ExtremumPoint, detect_extrema, detect_peaks, detect_valleys};
pub use purchase_markers::{PurchaseMarker, aggregate_purchases};
