//! Builds the single, time-ordered marker list for the candle series.

use crate::analysis::{Extrema, ExtremumPoint, PurchaseMarker};
use crate::config::PLOT_CONFIG;
use crate::models::{Marker, MarkerBand, MarkerShape};
use crate::utils::format_price;

/// Peaks, then valleys, then purchases, stable-sorted by time, so equal
/// timestamps keep that order. A hidden group is skipped entirely.
/// `show_peaks` gates valleys as well.
pub fn compose_markers(
    extrema: &Extrema,
    purchases: &[PurchaseMarker],
    show_peaks: bool,
    show_purchase_markers: bool,
) -> Vec<Marker> {
    let mut markers = Vec::new();

    if show_peaks {
        markers.extend(extrema.peaks.iter().map(peak_marker));
        markers.extend(extrema.valleys.iter().map(valley_marker));
    }

    if show_purchase_markers {
        markers.extend(purchases.iter().map(purchase_marker));
    }

    // sort_by_key is stable
    markers.sort_by_key(|m| m.time);
    markers
}

fn peak_marker(p: &ExtremumPoint) -> Marker {
    Marker {
        time: p.time,
        band: MarkerBand::Above,
        color: PLOT_CONFIG.peak_marker_color,
        shape: MarkerShape::ArrowDown,
        label: Some(format_price(p.price)),
    }
}

fn valley_marker(v: &ExtremumPoint) -> Marker {
    Marker {
        time: v.time,
        band: MarkerBand::Below,
        color: PLOT_CONFIG.valley_marker_color,
        shape: MarkerShape::ArrowUp,
        label: Some(format_price(v.price)),
    }
}

fn purchase_marker(p: &PurchaseMarker) -> Marker {
    Marker {
        time: p.date,
        band: MarkerBand::In,
        color: PLOT_CONFIG.purchase_marker_color,
        shape: MarkerShape::Circle,
        label: None,
    }
}
