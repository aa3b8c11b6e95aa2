//! Fetch tasks. Each one runs on the Tokio runtime, never touches engine
//! state, and reports back over the result channel.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::messages::{FetchPayload, FetchResult};

use crate::data::{ChartDataProvider, PurchaseLedger};
use crate::error::{FetchKind, LoadError};
use crate::models::{ChartDataset, LoadTicket};
use crate::utils::AppInstant;

/// Fetch and validate the chart dataset for `ticket`.
pub(crate) fn spawn_chart_fetch(
    provider: Arc<dyn ChartDataProvider>,
    ticket: LoadTicket,
    tx: UnboundedSender<FetchResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = AppInstant::now();
        let symbol = ticket.instrument.symbol.clone();

        let result = match provider.fetch_chart(&symbol, ticket.timeframe).await {
            Ok(response) => crate::trace_time!(&format!("Validate dataset [{}]", symbol), 2_000, {
                ChartDataset::from_response(response, ticket.timeframe)
            }),
            Err(source) => Err(LoadError::Fetch {
                kind: FetchKind::Chart,
                symbol: symbol.clone(),
                timeframe: ticket.timeframe,
                source,
            }),
        };

        // Receiver gone means the engine was dropped
        let _ = tx.send(FetchResult {
            epoch: ticket.epoch,
            symbol,
            duration_ms: start.elapsed().as_millis(),
            payload: FetchPayload::Chart(result),
        });
    })
}

/// List the purchase lots of the ticket's instrument.
pub(crate) fn spawn_purchase_fetch(
    ledger: Arc<dyn PurchaseLedger>,
    ticket: LoadTicket,
    seq: u64,
    tx: UnboundedSender<FetchResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = AppInstant::now();
        let symbol = ticket.instrument.symbol.clone();

        let result = ledger
            .list(ticket.instrument.id)
            .await
            .map_err(|source| LoadError::Fetch {
                kind: FetchKind::Purchases,
                symbol: symbol.clone(),
                timeframe: ticket.timeframe,
                source,
            });

        let _ = tx.send(FetchResult {
            epoch: ticket.epoch,
            symbol,
            duration_ms: start.elapsed().as_millis(),
            payload: FetchPayload::Purchases { seq, result },
        });
    })
}
