//! User visibility toggles. Changing these never triggers a fetch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::domain::IndicatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorToggle {
    pub visible: bool,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TogglesState {
    pub indicators: BTreeMap<IndicatorKind, IndicatorToggle>,
    /// Gates both peaks and valleys
    pub show_peaks: bool,
    pub show_volume: bool,
    pub show_purchase_markers: bool,
}

impl Default for TogglesState {
    fn default() -> Self {
        let indicators = IndicatorKind::iter()
            .map(|kind| {
                (
                    kind,
                    IndicatorToggle {
                        visible: false,
                        period: kind.default_period(),
                    },
                )
            })
            .collect();

        Self {
            indicators,
            show_peaks: true,
            show_volume: true,
            show_purchase_markers: true,
        }
    }
}

impl TogglesState {
    /// Flip visibility of `kind`. Returns the new visibility.
    pub fn toggle_indicator(&mut self, kind: IndicatorKind) -> bool {
        let entry = self.entry(kind);
        entry.visible = !entry.visible;
        entry.visible
    }

    pub fn set_indicator_visible(&mut self, kind: IndicatorKind, visible: bool) {
        self.entry(kind).visible = visible;
    }

    pub fn is_visible(&self, kind: IndicatorKind) -> bool {
        self.indicators.get(&kind).is_some_and(|t| t.visible)
    }

    pub fn period(&self, kind: IndicatorKind) -> u32 {
        self.indicators
            .get(&kind)
            .map_or_else(|| kind.default_period(), |t| t.period)
    }

    /// Kinds the user wants on the chart.
    pub fn desired_indicators(&self) -> BTreeSet<IndicatorKind> {
        self.indicators
            .iter()
            .filter(|(_, t)| t.visible)
            .map(|(kind, _)| *kind)
            .collect()
    }

    // Older preference files may lack a kind; fill it in on demand.
    fn entry(&mut self, kind: IndicatorKind) -> &mut IndicatorToggle {
        self.indicators.entry(kind).or_insert(IndicatorToggle {
            visible: false,
            period: kind.default_period(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hide_every_indicator() {
        let t = TogglesState::default();
        assert!(t.desired_indicators().is_empty());
        assert!(t.show_peaks && t.show_volume && t.show_purchase_markers);
        assert_eq!(t.period(IndicatorKind::Ema), 12);
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut t = TogglesState::default();
        assert!(t.toggle_indicator(IndicatorKind::Sma50));
        assert!(t.is_visible(IndicatorKind::Sma50));
        assert!(!t.toggle_indicator(IndicatorKind::Sma50));
        assert!(t.desired_indicators().is_empty());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let t: TogglesState = serde_json::from_str(
            r#"{"indicators": {"ema": {"visible": true, "period": 9}}, "show_volume": false}"#,
        )
        .unwrap();
        assert!(t.is_visible(IndicatorKind::Ema));
        assert_eq!(t.period(IndicatorKind::Ema), 9);
        assert!(!t.show_volume);
        assert!(t.show_peaks);
        // Missing kinds fall back to their default period and stay hidden.
        assert_eq!(t.period(IndicatorKind::Bollinger), 20);
        assert!(!t.is_visible(IndicatorKind::Bollinger));
    }
}
