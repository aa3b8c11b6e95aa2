use crate::domain::PurchaseLot;
use crate::error::{FetchKind, LoadError};
use crate::models::ChartDataset;

/// What a fetch task hands back to the engine.
#[derive(Debug)]
pub(crate) struct FetchResult {
    /// Epoch of the selection the fetch was issued for
    pub epoch: u64,
    pub symbol: String,
    pub duration_ms: u128,
    pub payload: FetchPayload,
}

#[derive(Debug)]
pub(crate) enum FetchPayload {
    Chart(Result<ChartDataset, LoadError>),
    Purchases {
        /// Reload sequence within the epoch
        seq: u64,
        result: Result<Vec<PurchaseLot>, LoadError>,
    },
}

impl FetchPayload {
    pub fn kind(&self) -> FetchKind {
        match self {
            Self::Chart(_) => FetchKind::Chart,
            Self::Purchases { .. } => FetchKind::Purchases,
        }
    }
}

/// Outcome of applying one fetch result, reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChartApplied { epoch: u64, candles: usize },
    PurchasesApplied { epoch: u64, lots: usize },
    /// A newer selection (or reload) superseded this result
    StaleDiscarded { kind: FetchKind, epoch: u64 },
    /// Prior data stays on screen
    LoadFailed { kind: FetchKind, epoch: u64, message: String },
}
