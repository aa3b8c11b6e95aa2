//! Error types surfaced by the load pipeline.

use thiserror::Error;

use crate::domain::Timeframe;

/// Which of the two per-selection fetches an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FetchKind {
    #[strum(to_string = "chart dataset")]
    Chart,
    #[strum(to_string = "purchase lots")]
    Purchases,
}

#[derive(Debug, Error)]
pub enum LoadError {
    /// Provider or ledger failure (network, I/O, decode).
    #[error("failed to fetch {kind} for {symbol} ({timeframe}): {source:#}")]
    Fetch {
        kind: FetchKind,
        symbol: String,
        timeframe: Timeframe,
        #[source]
        source: anyhow::Error,
    },

    /// Payload arrived but breaks the dataset invariants.
    #[error("invalid chart dataset for {symbol}: {reason}")]
    InvalidDataset { symbol: String, reason: String },
}

impl LoadError {
    pub fn kind(&self) -> FetchKind {
        match self {
            Self::Fetch { kind, .. } => *kind,
            Self::InvalidDataset { .. } => FetchKind::Chart,
        }
    }
}
