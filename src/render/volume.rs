use crate::config::PLOT_CONFIG;
use crate::domain::{Candle, CandleType};
use crate::render::VolumeBar;

/// One histogram bar per candle, coloured by session direction.
pub fn build_volume_bars(candles: &[Candle]) -> Vec<VolumeBar> {
    candles
        .iter()
        .map(|c| VolumeBar {
            time: c.time,
            value: c.volume,
            color: match c.get_type() {
                CandleType::Bullish => PLOT_CONFIG.volume_up_color,
                CandleType::Bearish => PLOT_CONFIG.volume_down_color,
            },
        })
        .collect()
}
