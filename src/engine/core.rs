use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::analysis::{Extrema, aggregate_purchases, detect_extrema};
use crate::config::{ANALYSIS, AnalysisConfig};
use crate::data::{ChartDataProvider, PurchaseLedger};
use crate::domain::{
    IndicatorKind, Instrument, LotId, NewPurchaseLot, PurchaseLot, PurchaseLotPatch, Timeframe,
};
use crate::error::FetchKind;
use crate::models::{ChartDataset, ChartSession, LoadTicket, TogglesState};
use crate::render::{
    OverlayReconciler, RenderingSurface, SurfaceOptions, build_volume_bars, compose_markers,
};

use super::messages::{EngineEvent, FetchPayload, FetchResult};
use super::worker;

/// Drives one rendering surface.
///
/// All session and surface mutation happens on the caller's context through
/// `&mut self`. Fetches run as Tokio tasks and only send results back over a
/// channel, which the caller drains with [`ChartEngine::process_pending`] or
/// awaits with [`ChartEngine::next_update`]. Fetch-issuing methods must be
/// called from within a Tokio runtime.
pub struct ChartEngine<S: RenderingSurface> {
    session: ChartSession,
    surface: S,
    reconciler: OverlayReconciler,

    provider: Arc<dyn ChartDataProvider>,
    ledger: Arc<dyn PurchaseLedger>,

    result_tx: UnboundedSender<FetchResult>,
    result_rx: UnboundedReceiver<FetchResult>,

    in_flight: Vec<JoinHandle<()>>,

    /// Detector settings
    pub analysis: AnalysisConfig,
    disposed: bool,
}

impl<S: RenderingSurface> ChartEngine<S> {
    /// Take ownership of `surface`, initialise and size it.
    pub fn new(
        surface: S,
        provider: Arc<dyn ChartDataProvider>,
        ledger: Arc<dyn PurchaseLedger>,
    ) -> Self {
        Self::with_options(surface, provider, ledger, SurfaceOptions::default())
    }

    pub fn with_options(
        mut surface: S,
        provider: Arc<dyn ChartDataProvider>,
        ledger: Arc<dyn PurchaseLedger>,
        options: SurfaceOptions,
    ) -> Self {
        // 1. Surface lifecycle
        surface.initialize(&options);
        surface.resize(options.width, options.height);

        // 2. Result channel (fetch tasks hold clones of the sender)
        let (result_tx, result_rx) = unbounded_channel();

        Self {
            session: ChartSession::new(Timeframe::default(), TogglesState::default()),
            surface,
            reconciler: OverlayReconciler::new(),
            provider,
            ledger,
            result_tx,
            result_rx,
            in_flight: Vec::new(),
            analysis: ANALYSIS,
            disposed: false,
        }
    }

    /// Restore persisted toggles and timeframe before the first selection.
    pub fn with_preferences(mut self, timeframe: Timeframe, toggles: TogglesState) -> Self {
        self.session.timeframe = timeframe;
        self.session.toggles = toggles;
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    // --- ACCESSORS ---

    pub fn session(&self) -> &ChartSession {
        &self.session
    }

    pub fn toggles(&self) -> &TogglesState {
        &self.session.toggles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reconciler(&self) -> &OverlayReconciler {
        &self.reconciler
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // --- SELECTION ---

    /// Select an instrument at the current timeframe and start both fetches.
    pub fn select_instrument(&mut self, instrument: Instrument) -> Option<LoadTicket> {
        let timeframe = self.session.timeframe;
        self.load(instrument, timeframe)
    }

    /// Change timeframe. Reloads the current instrument if one is selected,
    /// unless its chart is already loaded at `timeframe`.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Option<LoadTicket> {
        if timeframe == self.session.timeframe && self.session.chart_is_current() {
            return None;
        }
        match self.session.instrument.clone() {
            Some(instrument) => self.load(instrument, timeframe),
            None => {
                self.session.timeframe = timeframe;
                None
            }
        }
    }

    /// Re-run both fetches for the current selection.
    pub fn reload(&mut self) -> Option<LoadTicket> {
        let instrument = self.session.instrument.clone()?;
        let timeframe = self.session.timeframe;
        self.load(instrument, timeframe)
    }

    fn load(&mut self, instrument: Instrument, timeframe: Timeframe) -> Option<LoadTicket> {
        if self.disposed {
            log::warn!("Ignoring selection of {} on a disposed surface", instrument);
            return None;
        }

        let ticket = self.session.begin_selection(instrument, timeframe);

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.log_engine {
            log::info!(
                "ENGINE: epoch {} -> loading {} ({})",
                ticket.epoch,
                ticket.instrument,
                ticket.timeframe
            );
        }

        // Two independent, unsequenced fetches tagged with the same epoch
        self.prune_finished();
        self.in_flight.push(worker::spawn_chart_fetch(
            self.provider.clone(),
            ticket.clone(),
            self.result_tx.clone(),
        ));
        self.in_flight.push(worker::spawn_purchase_fetch(
            self.ledger.clone(),
            ticket.clone(),
            self.session.purchase_seq,
            self.result_tx.clone(),
        ));

        Some(ticket)
    }

    /// Re-list purchases for the current selection without touching the chart.
    pub fn reload_purchases(&mut self) -> Option<u64> {
        if self.disposed {
            return None;
        }
        let (ticket, seq) = self.session.begin_purchase_reload()?;
        self.prune_finished();
        self.in_flight.push(worker::spawn_purchase_fetch(
            self.ledger.clone(),
            ticket,
            seq,
            self.result_tx.clone(),
        ));
        Some(seq)
    }

    // --- LEDGER PASS-THROUGH ---

    pub async fn create_purchase(&mut self, lot: NewPurchaseLot) -> anyhow::Result<PurchaseLot> {
        let created = self.ledger.create(lot).await?;
        self.reload_purchases();
        Ok(created)
    }

    pub async fn update_purchase(
        &mut self,
        id: LotId,
        patch: PurchaseLotPatch,
    ) -> anyhow::Result<PurchaseLot> {
        let updated = self.ledger.update(id, patch).await?;
        self.reload_purchases();
        Ok(updated)
    }

    pub async fn delete_purchase(&mut self, id: LotId) -> anyhow::Result<()> {
        self.ledger.delete(id).await?;
        self.reload_purchases();
        Ok(())
    }

    // --- TOGGLES (never fetch) ---

    /// Flip an indicator and reconcile overlays. Returns the new visibility.
    pub fn toggle_indicator(&mut self, kind: IndicatorKind) -> bool {
        let visible = self.session.toggles.toggle_indicator(kind);
        self.reconcile_overlays();
        visible
    }

    pub fn set_indicator_visible(&mut self, kind: IndicatorKind, visible: bool) {
        self.session.toggles.set_indicator_visible(kind, visible);
        self.reconcile_overlays();
    }

    pub fn set_show_peaks(&mut self, show: bool) {
        self.session.toggles.show_peaks = show;
        self.refresh_markers();
    }

    pub fn set_show_purchase_markers(&mut self, show: bool) {
        self.session.toggles.show_purchase_markers = show;
        self.refresh_markers();
    }

    pub fn set_show_volume(&mut self, show: bool) {
        self.session.toggles.show_volume = show;
        self.refresh_volume();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.disposed {
            self.surface.resize(width, height);
        }
    }

    // --- RESULT INTAKE ---

    /// Apply every result that has already arrived, without waiting.
    pub fn process_pending(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            events.push(self.handle_fetch_result(result));
        }
        events
    }

    /// Wait for the next fetch result and apply it.
    pub async fn next_update(&mut self) -> Option<EngineEvent> {
        let result = self.result_rx.recv().await?;
        Some(self.handle_fetch_result(result))
    }

    /// Keep applying results until the current selection leaves `Loading`.
    pub async fn settle(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while self.session.is_loading() {
            match self.next_update().await {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events.extend(self.process_pending());
        events
    }

    fn handle_fetch_result(&mut self, result: FetchResult) -> EngineEvent {
        let kind = result.payload.kind();

        // 1. Stale guard
        let current = match &result.payload {
            FetchPayload::Chart(_) => self.session.is_current(result.epoch),
            FetchPayload::Purchases { seq, .. } => {
                self.session.is_current(result.epoch) && *seq == self.session.purchase_seq
            }
        };

        if !current {
            #[cfg(debug_assertions)]
            if crate::config::DEBUG_FLAGS.log_engine {
                log::info!(
                    "ENGINE: discarding stale {} for {} (epoch {}, current {})",
                    kind,
                    result.symbol,
                    result.epoch,
                    self.session.request_epoch
                );
            }
            return EngineEvent::StaleDiscarded {
                kind,
                epoch: result.epoch,
            };
        }

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.log_engine {
            log::info!(
                "ENGINE: {} for {} arrived after {}ms",
                kind,
                result.symbol,
                result.duration_ms
            );
        }

        // 2. Apply
        match result.payload {
            FetchPayload::Chart(Ok(dataset)) => {
                let candles = dataset.len();
                self.apply_chart(dataset);
                self.session.resolve(FetchKind::Chart, None);
                EngineEvent::ChartApplied {
                    epoch: result.epoch,
                    candles,
                }
            }
            FetchPayload::Purchases { result: Ok(lots), .. } => {
                let count = lots.len();
                self.apply_purchases(lots);
                self.session.resolve(FetchKind::Purchases, None);
                EngineEvent::PurchasesApplied {
                    epoch: result.epoch,
                    lots: count,
                }
            }
            FetchPayload::Chart(Err(e)) | FetchPayload::Purchases { result: Err(e), .. } => {
                // Prior data stays in place
                log::error!("Load failed: {}", e);
                let message = e.to_string();
                self.session.resolve(kind, Some(message.clone()));
                EngineEvent::LoadFailed {
                    kind,
                    epoch: result.epoch,
                    message,
                }
            }
        }
    }

    fn apply_chart(&mut self, dataset: ChartDataset) {
        let dataset = Arc::new(dataset);

        // 1. Candles and volume
        self.surface.set_candle_data(&dataset.candles);
        self.session.set_chart(dataset.clone());
        self.refresh_volume();

        // 2. Extrema
        self.session.extrema = detect_extrema(&dataset.candles, self.analysis.extremum_window);

        // 3. Overlays against the new bundle
        let report = self
            .reconciler
            .refit(&mut self.surface, &self.session.toggles, &dataset.indicators);
        if !report.unavailable.is_empty() {
            log::debug!(
                "{}: requested indicators not in dataset: {:?}",
                dataset.symbol,
                report.unavailable
            );
        }

        // 4. Markers (purchase markers are re-derived for the new instrument)
        self.rebuild_purchase_markers();
        self.refresh_markers();

        // 5. Fit
        self.surface.fit_content();
    }

    fn apply_purchases(&mut self, lots: Vec<PurchaseLot>) {
        self.session.purchases = Some(lots);

        // Held back until the chart of this selection is on screen
        if self.session.chart_is_current() {
            self.rebuild_purchase_markers();
            self.refresh_markers();
        }
    }

    fn rebuild_purchase_markers(&mut self) {
        self.session.purchase_markers = match (&self.session.instrument, &self.session.purchases) {
            (Some(instrument), Some(lots)) => aggregate_purchases(lots, instrument.id),
            _ => Vec::new(),
        };
    }

    /// Recompose markers and push them in one call. No-op until a chart is
    /// loaded.
    fn refresh_markers(&mut self) {
        if self.session.chart.is_none() || self.disposed {
            return;
        }

        let toggles = &self.session.toggles;
        let markers = compose_markers(
            &self.session.extrema,
            &self.session.purchase_markers,
            toggles.show_peaks,
            toggles.show_purchase_markers,
        );

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.log_markers {
            log::info!("MARKERS: pushing {} markers", markers.len());
        }

        self.surface.set_markers(&markers);
    }

    fn refresh_volume(&mut self) {
        let Some(chart) = self.session.chart.as_ref() else {
            return;
        };
        if self.disposed {
            return;
        }
        let bars = if self.session.toggles.show_volume {
            build_volume_bars(&chart.candles)
        } else {
            Vec::new()
        };
        self.surface.set_volume_data(&bars);
    }

    fn reconcile_overlays(&mut self) {
        if self.disposed {
            return;
        }
        let bundle = self.session.chart.as_ref().map(|c| &c.indicators);
        self.reconciler
            .reconcile(&mut self.surface, &self.session.toggles, bundle);
    }

    fn prune_finished(&mut self) {
        self.in_flight.retain(|h| !h.is_finished());
    }

    // --- TEARDOWN ---

    /// Tear down the surface. Results still in flight are discarded when
    /// they arrive.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
        self.session.reset();
        self.reconciler.forget();
        self.surface.dispose();
        self.disposed = true;
    }

    /// Extrema of the loaded dataset.
    pub fn extrema(&self) -> &Extrema {
        &self.session.extrema
    }
}

impl<S: RenderingSurface> Drop for ChartEngine<S> {
    fn drop(&mut self) {
        for handle in &self.in_flight {
            handle.abort();
        }
    }
}
