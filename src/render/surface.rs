//! The rendering surface contract. The engine only pushes data through this
//! trait; how a surface paints is not its concern.

use crate::config::{OverlayStyle, PLOT_CONFIG, Quantity, Rgba};
use crate::domain::{Candle, IndicatorPoint, OverlayKey, TimePoint};
use crate::models::Marker;

/// Opaque id of an overlay series created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    pub time: TimePoint,
    pub value: Quantity,
    pub color: Rgba,
}

/// Look of the base chart, applied once on initialize.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    pub grid: Rgba,
    pub text: Rgba,
    pub candle_up: Rgba,
    pub candle_down: Rgba,
    /// Top margin of the volume pane as a fraction of the height
    pub volume_margin_top: f32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            width: PLOT_CONFIG.default_width,
            height: PLOT_CONFIG.default_height,
            background: PLOT_CONFIG.background_color,
            grid: PLOT_CONFIG.grid_color,
            text: PLOT_CONFIG.text_color,
            candle_up: PLOT_CONFIG.candle_up_color,
            candle_down: PLOT_CONFIG.candle_down_color,
            volume_margin_top: PLOT_CONFIG.volume_scale_margin_top,
        }
    }
}

pub trait RenderingSurface {
    fn initialize(&mut self, options: &SurfaceOptions);

    /// Reapply size. Must be idempotent.
    fn resize(&mut self, width: u32, height: u32);

    fn set_candle_data(&mut self, candles: &[Candle]);

    fn set_volume_data(&mut self, bars: &[VolumeBar]);

    fn add_overlay_series(&mut self, key: OverlayKey, style: &OverlayStyle) -> SeriesHandle;

    fn remove_overlay_series(&mut self, handle: SeriesHandle);

    fn set_overlay_data(&mut self, handle: SeriesHandle, points: &[IndicatorPoint]);

    /// Replace the whole marker set in one call.
    fn set_markers(&mut self, markers: &[Marker]);

    /// Fit the time scale to the loaded content.
    fn fit_content(&mut self);

    fn dispose(&mut self);
}
