#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use tokio::sync::Notify;

use chart_sync::domain::{IndicatorPoint, IndicatorSeries, NewPurchaseLot, Timeframe};
use chart_sync::models::{BollingerResponse, ChartResponse};
use chart_sync::{Candle, ChartDataProvider, ChartEngine, InMemoryLedger, InstrumentId, RecordingSurface};

pub fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)
}

/// `n` flat candles around `base`, with a single spike at `peak_at`.
pub fn candles(n: usize, base: f64, peak_at: Option<usize>) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let bump = if Some(i) == peak_at { 50.0 } else { 0.0 };
            let open = base;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            Candle::new(day(i as u64), open, base + 5.0 + bump, base - 5.0, close, 1_000 + i as u64)
        })
        .collect()
}

fn line(candles: &[Candle], skip: usize, offset: f64) -> IndicatorSeries {
    IndicatorSeries::new(
        candles
            .iter()
            .skip(skip)
            .map(|c| IndicatorPoint {
                time: c.time,
                value: c.close + offset,
            })
            .collect(),
    )
}

/// Chart payload carrying every indicator.
pub fn full_response(symbol: &str, n: usize, base: f64, peak_at: Option<usize>) -> ChartResponse {
    let data = candles(n, base, peak_at);
    ChartResponse {
        symbol: symbol.to_string(),
        sma25: Some(line(&data, 3, 0.0)),
        sma50: Some(line(&data, 5, 0.0)),
        sma75: Some(line(&data, 7, 0.0)),
        ema: Some(line(&data, 1, 0.5)),
        bollinger: Some(BollingerResponse {
            upper: line(&data, 4, 10.0),
            middle: line(&data, 4, 0.0),
            lower: line(&data, 4, -10.0),
        }),
        data,
    }
}

/// Chart payload with candles only.
pub fn bare_response(symbol: &str, n: usize, base: f64) -> ChartResponse {
    ChartResponse {
        symbol: symbol.to_string(),
        data: candles(n, base, None),
        ..Default::default()
    }
}

/// Provider whose per-symbol responses can be held back until released.
#[derive(Default)]
pub struct GatedProvider {
    responses: Mutex<HashMap<String, ChartResponse>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    failing: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl GatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: ChartResponse) -> Self {
        self.set_response(response);
        self
    }

    pub fn set_response(&self, response: ChartResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(response.symbol.clone(), response);
    }

    /// Hold `symbol` until the returned handle is notified.
    pub fn gate(&self, symbol: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(symbol.to_string(), notify.clone());
        notify
    }

    pub fn fail(&self, symbol: &str) {
        self.failing.lock().unwrap().push(symbol.to_string());
    }

    pub fn recover(&self, symbol: &str) {
        self.failing.lock().unwrap().retain(|s| s != symbol);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartDataProvider for GatedProvider {
    async fn fetch_chart(&self, symbol: &str, _timeframe: Timeframe) -> Result<ChartResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(symbol).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().iter().any(|s| s == symbol) {
            return Err(anyhow!("connection reset"));
        }

        self.responses
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("no data for {}", symbol))
    }
}

pub fn lot(instrument: u64, offset: u64, quantity: u64, price: f64) -> NewPurchaseLot {
    NewPurchaseLot {
        instrument_id: InstrumentId(instrument),
        date: day(offset),
        quantity,
        unit_price: price,
        note: None,
    }
}

pub fn engine(
    provider: Arc<GatedProvider>,
    ledger: Arc<InMemoryLedger>,
) -> ChartEngine<RecordingSurface> {
    ChartEngine::new(RecordingSurface::new(), provider, ledger)
}
