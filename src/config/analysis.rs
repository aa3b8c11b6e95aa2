//! Analysis and computation configuration

use serde::{Deserialize, Serialize};

/// Settings for the local extremum scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Half-width `w` of the symmetric window. A candle is compared against
    /// the `w` candles on each side, so at least `2w + 1` candles are needed.
    pub extremum_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig { extremum_window: 10 };
