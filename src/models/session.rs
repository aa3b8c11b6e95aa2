//! Per-surface chart session: selection, toggles, loaded data and the
//! request epoch that decides which async results are still wanted.

use std::sync::Arc;

use crate::analysis::{Extrema, PurchaseMarker};
use crate::domain::{Instrument, PurchaseLot, Timeframe};
use crate::error::FetchKind;
use crate::models::{ChartDataset, TogglesState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Tag carried by every fetch issued for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub epoch: u64,
    pub instrument: Instrument,
    pub timeframe: Timeframe,
}

#[derive(Debug, Default)]
pub struct ChartSession {
    pub instrument: Option<Instrument>,
    pub timeframe: Timeframe,
    pub toggles: TogglesState,

    /// Wholesale-replaced on every successful chart fetch
    pub chart: Option<Arc<ChartDataset>>,
    /// Wholesale-replaced on every successful ledger fetch
    pub purchases: Option<Vec<PurchaseLot>>,

    /// Derived from `chart`
    pub extrema: Extrema,
    /// Derived from `purchases`, only once the chart of the same selection
    /// is loaded
    pub purchase_markers: Vec<PurchaseMarker>,

    /// Bumped on every selection change. Results tagged with an older epoch
    /// are discarded.
    pub request_epoch: u64,
    /// Bumped on every purchase reload within one epoch
    pub purchase_seq: u64,

    pub load_state: LoadState,
    pub last_error: Option<String>,

    /// Epoch the loaded `chart` was fetched under
    chart_epoch: u64,
    chart_pending: bool,
    purchases_pending: bool,
}

impl ChartSession {
    pub fn new(timeframe: Timeframe, toggles: TogglesState) -> Self {
        Self {
            timeframe,
            toggles,
            ..Default::default()
        }
    }

    /// Start a new selection. Previously loaded data stays in place until
    /// the new results land.
    pub fn begin_selection(&mut self, instrument: Instrument, timeframe: Timeframe) -> LoadTicket {
        self.request_epoch += 1;
        self.purchase_seq = 0;
        self.instrument = Some(instrument.clone());
        self.timeframe = timeframe;
        self.load_state = LoadState::Loading;
        self.last_error = None;
        self.chart_pending = true;
        self.purchases_pending = true;

        LoadTicket {
            epoch: self.request_epoch,
            instrument,
            timeframe,
        }
    }

    /// Ticket for a purchase-only reload of the current selection.
    pub fn begin_purchase_reload(&mut self) -> Option<(LoadTicket, u64)> {
        let instrument = self.instrument.clone()?;
        self.purchase_seq += 1;
        self.purchases_pending = true;
        if self.load_state != LoadState::Failed {
            self.load_state = LoadState::Loading;
        }
        Some((
            LoadTicket {
                epoch: self.request_epoch,
                instrument,
                timeframe: self.timeframe,
            },
            self.purchase_seq,
        ))
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.instrument.is_some() && epoch == self.request_epoch
    }

    /// Replace the loaded chart with a result of the current epoch.
    pub fn set_chart(&mut self, chart: Arc<ChartDataset>) {
        self.chart = Some(chart);
        self.chart_epoch = self.request_epoch;
    }

    /// True when the loaded chart belongs to the current selection. False
    /// while a new selection's chart is pending or after it failed.
    pub fn chart_is_current(&self) -> bool {
        self.chart.is_some() && self.instrument.is_some() && self.chart_epoch == self.request_epoch
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Record that a current-epoch fetch resolved and advance the state.
    /// A failure sticks for the rest of the epoch.
    pub fn resolve(&mut self, kind: FetchKind, error: Option<String>) {
        match kind {
            FetchKind::Chart => self.chart_pending = false,
            FetchKind::Purchases => self.purchases_pending = false,
        }

        if let Some(e) = error {
            self.last_error = Some(e);
            self.load_state = LoadState::Failed;
            return;
        }

        if self.load_state == LoadState::Loading && !self.chart_pending && !self.purchases_pending {
            self.load_state = LoadState::Ready;
        }
    }

    /// Tear down on surface unmount. Any in-flight result becomes stale.
    pub fn reset(&mut self) {
        self.request_epoch += 1;
        self.instrument = None;
        self.chart = None;
        self.chart_epoch = 0;
        self.purchases = None;
        self.extrema = Extrema::default();
        self.purchase_markers.clear();
        self.load_state = LoadState::Idle;
        self.last_error = None;
        self.chart_pending = false;
        self.purchases_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_bumps_epoch_and_enters_loading() {
        let mut s = ChartSession::default();
        assert_eq!(s.load_state, LoadState::Idle);
        let a = s.begin_selection(Instrument::new(1, "7203", "Toyota"), Timeframe::Daily);
        let b = s.begin_selection(Instrument::new(2, "6758", "Sony"), Timeframe::Weekly);
        assert_eq!(a.epoch + 1, b.epoch);
        assert!(!s.is_current(a.epoch));
        assert!(s.is_current(b.epoch));
        assert_eq!(s.load_state, LoadState::Loading);
    }

    #[test]
    fn ready_only_after_both_fetches() {
        let mut s = ChartSession::default();
        s.begin_selection(Instrument::new(1, "7203", ""), Timeframe::Daily);
        s.resolve(FetchKind::Chart, None);
        assert_eq!(s.load_state, LoadState::Loading);
        s.resolve(FetchKind::Purchases, None);
        assert_eq!(s.load_state, LoadState::Ready);
    }

    #[test]
    fn failure_sticks_for_the_epoch() {
        let mut s = ChartSession::default();
        s.begin_selection(Instrument::new(1, "7203", ""), Timeframe::Daily);
        s.resolve(FetchKind::Chart, Some("boom".into()));
        s.resolve(FetchKind::Purchases, None);
        assert_eq!(s.load_state, LoadState::Failed);
        assert_eq!(s.last_error.as_deref(), Some("boom"));

        s.begin_selection(Instrument::new(1, "7203", ""), Timeframe::Monthly);
        assert_eq!(s.load_state, LoadState::Loading);
        assert!(s.last_error.is_none());
    }

    #[test]
    fn chart_goes_stale_on_new_selection() {
        let mut s = ChartSession::default();
        s.begin_selection(Instrument::new(1, "7203", ""), Timeframe::Daily);
        assert!(!s.chart_is_current());

        let candles = vec![crate::domain::Candle::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            1.0,
            2.0,
            0.5,
            1.5,
            10,
        )];
        let chart = ChartDataset::new("7203", Timeframe::Daily, candles, Default::default()).unwrap();
        s.set_chart(Arc::new(chart));
        assert!(s.chart_is_current());

        s.begin_selection(Instrument::new(2, "6758", ""), Timeframe::Daily);
        assert!(s.chart.is_some());
        assert!(!s.chart_is_current());
    }

    #[test]
    fn reset_invalidates_in_flight_epoch() {
        let mut s = ChartSession::default();
        let t = s.begin_selection(Instrument::new(1, "7203", ""), Timeframe::Daily);
        s.reset();
        assert!(!s.is_current(t.epoch));
        assert_eq!(s.load_state, LoadState::Idle);
    }
}
