//! Plot visualization configuration

use std::fmt;

use crate::domain::OverlayKey;

/// Straight (non-premultiplied) RGBA colour handed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba_unmultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

pub struct PlotConfig {
    // --- MARKERS ---
    pub peak_marker_color: Rgba,
    pub valley_marker_color: Rgba,
    pub purchase_marker_color: Rgba,
    /// Prefix for extremum labels, e.g. "¥12,345"
    pub currency_prefix: &'static str,

    // --- CANDLESTICKS ---
    // Red-up / green-down (Tokyo convention)
    pub candle_up_color: Rgba,
    pub candle_down_color: Rgba,

    // --- VOLUME ---
    pub volume_up_color: Rgba,
    pub volume_down_color: Rgba,
    /// Fraction of the pane reserved above the volume histogram
    pub volume_scale_margin_top: f32,

    // --- SURFACE ---
    pub background_color: Rgba,
    pub grid_color: Rgba,
    pub text_color: Rgba,
    pub default_width: u32,
    pub default_height: u32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    peak_marker_color: Rgba::from_rgb(0xFF, 0x98, 0x00),   // Orange
    valley_marker_color: Rgba::from_rgb(0x21, 0x96, 0xF3), // Blue
    purchase_marker_color: Rgba::from_rgb(0xFF, 0x98, 0x00),
    currency_prefix: "¥",

    candle_up_color: Rgba::from_rgb(0xEF, 0x53, 0x50),
    candle_down_color: Rgba::from_rgb(0x26, 0xA6, 0x9A),

    // Same hues as the candles at 50% opacity
    volume_up_color: Rgba::from_rgba_unmultiplied(0xEF, 0x53, 0x50, 0x80),
    volume_down_color: Rgba::from_rgba_unmultiplied(0x26, 0xA6, 0x9A, 0x80),
    volume_scale_margin_top: 0.8,

    background_color: Rgba::from_rgb(0x0F, 0x0F, 0x0F),
    grid_color: Rgba::from_rgb(0x2A, 0x2A, 0x2A),
    text_color: Rgba::from_rgb(0x9C, 0xA3, 0xAF),
    default_width: 1280,
    default_height: 720,
};

/// Fixed display style of one overlay line.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub color: Rgba,
    pub line_width: u32,
    pub title: String,
    pub price_line_visible: bool,
    pub last_value_visible: bool,
    pub crosshair_marker_visible: bool,
}

/// Static row of the per-key style table.
pub struct OverlayStyleEntry {
    pub key: OverlayKey,
    pub color: Rgba,
    pub line_width: u32,
    pub title: &'static str,
    /// Title is rendered as `"{title}({period})"`
    pub title_with_period: bool,
}

pub const OVERLAY_STYLES: &[OverlayStyleEntry] = &[
    OverlayStyleEntry {
        key: OverlayKey::Sma25,
        color: Rgba::from_rgb(0xFF, 0xD6, 0x00),
        line_width: 1,
        title: "SMA(25)",
        title_with_period: false,
    },
    OverlayStyleEntry {
        key: OverlayKey::Sma50,
        color: Rgba::from_rgb(0xFF, 0x6D, 0x00),
        line_width: 1,
        title: "SMA(50)",
        title_with_period: false,
    },
    OverlayStyleEntry {
        key: OverlayKey::Sma75,
        color: Rgba::from_rgb(0x00, 0xC8, 0x53),
        line_width: 1,
        title: "SMA(75)",
        title_with_period: false,
    },
    OverlayStyleEntry {
        key: OverlayKey::Ema,
        color: Rgba::from_rgb(0xFF, 0xD6, 0x00),
        line_width: 2,
        title: "EMA",
        title_with_period: true,
    },
    OverlayStyleEntry {
        key: OverlayKey::BbUpper,
        color: Rgba::from_rgb(0x00, 0xBC, 0xD4),
        line_width: 1,
        title: "BB Upper",
        title_with_period: false,
    },
    OverlayStyleEntry {
        key: OverlayKey::BbMiddle,
        color: Rgba::from_rgb(0x00, 0xBC, 0xD4),
        line_width: 1,
        title: "BB Middle",
        title_with_period: false,
    },
    OverlayStyleEntry {
        key: OverlayKey::BbLower,
        color: Rgba::from_rgb(0x00, 0xBC, 0xD4),
        line_width: 1,
        title: "BB Lower",
        title_with_period: false,
    },
];

/// Resolve the display style for `key`. `period` only affects keys whose
/// title carries the period (EMA).
pub fn overlay_style(key: OverlayKey, period: Option<u32>) -> OverlayStyle {
    // Every OverlayKey has a row; a missing one falls back to a neutral line.
    let Some(entry) = OVERLAY_STYLES.iter().find(|e| e.key == key) else {
        log::warn!("No overlay style for {}; using fallback", key);
        return OverlayStyle {
            color: PLOT_CONFIG.text_color,
            line_width: 1,
            title: key.to_string(),
            price_line_visible: false,
            last_value_visible: false,
            crosshair_marker_visible: false,
        };
    };

    let title = match (entry.title_with_period, period) {
        (true, Some(p)) => format!("{}({})", entry.title, p),
        _ => entry.title.to_string(),
    };

    OverlayStyle {
        color: entry.color,
        line_width: entry.line_width,
        title,
        price_line_visible: false,
        last_value_visible: false,
        crosshair_marker_visible: false,
    }
}
