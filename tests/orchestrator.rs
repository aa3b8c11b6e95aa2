mod common;

use std::sync::Arc;

use chart_sync::{
    EngineEvent, FetchKind, InMemoryLedger, IndicatorKind, Instrument, LoadState, PurchaseLedger,
    SurfaceCall, Timeframe,
};
use common::{GatedProvider, bare_response, day, full_response, lot};

#[tokio::test]
async fn stale_result_of_previous_selection_is_discarded() {
    let provider = Arc::new(
        GatedProvider::new()
            .with_response(full_response("AAA", 25, 100.0, Some(12)))
            .with_response(bare_response("BBB", 30, 500.0)),
    );
    let gate_a = provider.gate("AAA");
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.create(lot(1, 12, 10, 100.0)).await.unwrap();
    ledger.create(lot(2, 3, 100, 500.0)).await.unwrap();

    let mut engine = common::engine(provider.clone(), ledger);
    engine.set_indicator_visible(IndicatorKind::Sma25, true);

    let a = engine
        .select_instrument(Instrument::new(1, "AAA", "Alpha"))
        .unwrap();
    let b = engine
        .select_instrument(Instrument::new(2, "BBB", "Beta"))
        .unwrap();
    assert!(b.epoch > a.epoch);

    let events = engine.settle().await;
    assert!(events.contains(&EngineEvent::ChartApplied {
        epoch: b.epoch,
        candles: 30
    }));
    assert_eq!(engine.session().load_state, LoadState::Ready);

    // A's chart lands after B's
    gate_a.notify_one();
    let late = engine.next_update().await.unwrap();
    assert_eq!(
        late,
        EngineEvent::StaleDiscarded {
            kind: FetchKind::Chart,
            epoch: a.epoch
        }
    );

    let session = engine.session();
    assert_eq!(session.chart.as_ref().unwrap().symbol, "BBB");
    assert_eq!(session.load_state, LoadState::Ready);
    assert_eq!(session.purchase_markers.len(), 1);
    assert_eq!(session.purchase_markers[0].date, day(3));

    let surface = engine.surface();
    assert_eq!(surface.candles().len(), 30);
    assert!(surface.overlay_keys().is_empty());
    let candle_pushes = surface
        .calls()
        .iter()
        .filter(|c| matches!(c, SurfaceCall::SetCandles { .. }))
        .count();
    assert_eq!(candle_pushes, 1);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn failure_keeps_prior_data_and_sets_failed() {
    let provider = Arc::new(GatedProvider::new().with_response(full_response("AAA", 25, 100.0, Some(12))));
    provider.fail("BBB");
    let mut engine = common::engine(provider.clone(), Arc::new(InMemoryLedger::new()));

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;
    assert_eq!(engine.session().load_state, LoadState::Ready);
    let markers_before = engine.surface().markers().to_vec();
    assert!(!markers_before.is_empty());

    let ticket = engine
        .select_instrument(Instrument::new(2, "BBB", "Beta"))
        .unwrap();
    let events = engine.settle().await;

    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::LoadFailed { kind: FetchKind::Chart, epoch, .. } if *epoch == ticket.epoch
    )));
    let session = engine.session();
    assert_eq!(session.load_state, LoadState::Failed);
    assert!(!engine.is_loading());
    assert!(session.last_error.as_deref().unwrap().contains("connection reset"));

    // Nothing cleared
    assert_eq!(session.chart.as_ref().unwrap().symbol, "AAA");
    assert_eq!(engine.surface().candles().len(), 25);
    assert_eq!(engine.surface().markers(), markers_before.as_slice());
}

#[tokio::test]
async fn invalid_dataset_is_treated_as_a_failed_load() {
    let mut broken = bare_response("AAA", 5, 100.0);
    broken.data.swap(1, 2);
    let provider = Arc::new(GatedProvider::new().with_response(broken));
    let mut engine = common::engine(provider, Arc::new(InMemoryLedger::new()));

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;

    assert_eq!(engine.session().load_state, LoadState::Failed);
    assert!(engine.session().chart.is_none());
    assert!(engine.surface().candles().is_empty());
}

#[tokio::test]
async fn purchases_before_chart_wait_for_the_chart() {
    let provider = Arc::new(GatedProvider::new().with_response(full_response("AAA", 25, 100.0, None)));
    let gate = provider.gate("AAA");
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.create(lot(1, 4, 100, 1000.0)).await.unwrap();
    ledger.create(lot(1, 4, 50, 1100.0)).await.unwrap();
    let mut engine = common::engine(provider, ledger);

    let ticket = engine
        .select_instrument(Instrument::new(1, "AAA", "Alpha"))
        .unwrap();

    let first = engine.next_update().await.unwrap();
    assert_eq!(
        first,
        EngineEvent::PurchasesApplied {
            epoch: ticket.epoch,
            lots: 2
        }
    );
    assert!(engine.is_loading());
    assert!(engine.surface().markers().is_empty());
    assert!(
        !engine
            .surface()
            .calls()
            .iter()
            .any(|c| matches!(c, SurfaceCall::SetMarkers { .. }))
    );

    gate.notify_one();
    engine.settle().await;

    let session = engine.session();
    assert_eq!(session.load_state, LoadState::Ready);
    assert_eq!(session.purchase_markers[0].total_quantity, 150);
    assert!((session.purchase_markers[0].weighted_average_price - 1033.333).abs() < 0.01);
    assert_eq!(engine.surface().markers().len(), 1);
    assert_eq!(engine.surface().markers()[0].time, day(4));
}

#[tokio::test]
async fn ledger_mutation_reloads_purchases_only() {
    let provider = Arc::new(GatedProvider::new().with_response(full_response("AAA", 25, 100.0, Some(12))));
    let mut engine = common::engine(provider.clone(), Arc::new(InMemoryLedger::new()));

    let ticket = engine
        .select_instrument(Instrument::new(1, "AAA", "Alpha"))
        .unwrap();
    engine.settle().await;
    assert!(engine.session().purchase_markers.is_empty());

    let created = engine.create_purchase(lot(1, 12, 30, 150.0)).await.unwrap();
    assert!(engine.is_loading());
    let events = engine.settle().await;
    assert_eq!(
        events,
        vec![EngineEvent::PurchasesApplied {
            epoch: ticket.epoch,
            lots: 1
        }]
    );
    assert_eq!(engine.session().purchase_markers.len(), 1);
    assert_eq!(engine.surface().markers().len(), 2);

    engine.delete_purchase(created.id).await.unwrap();
    engine.settle().await;
    assert!(engine.session().purchase_markers.is_empty());
    assert_eq!(engine.surface().markers().len(), 1);

    // No chart refetch
    assert_eq!(provider.call_count(), 1);
    assert_eq!(engine.session().request_epoch, ticket.epoch);
}

#[tokio::test]
async fn later_purchase_reload_wins() {
    let provider = Arc::new(GatedProvider::new().with_response(bare_response("AAA", 5, 100.0)));
    let mut engine = common::engine(provider, Arc::new(InMemoryLedger::new()));

    let ticket = engine
        .select_instrument(Instrument::new(1, "AAA", "Alpha"))
        .unwrap();
    engine.settle().await;

    let first = engine.reload_purchases().unwrap();
    let second = engine.reload_purchases().unwrap();
    assert!(second > first);

    let events = engine.settle().await;
    assert_eq!(
        events,
        vec![
            EngineEvent::StaleDiscarded {
                kind: FetchKind::Purchases,
                epoch: ticket.epoch
            },
            EngineEvent::PurchasesApplied {
                epoch: ticket.epoch,
                lots: 0
            },
        ]
    );
}

#[tokio::test]
async fn toggles_never_fetch() {
    let provider = Arc::new(GatedProvider::new().with_response(full_response("AAA", 25, 100.0, Some(12))));
    let mut engine = common::engine(provider.clone(), Arc::new(InMemoryLedger::new()));

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;

    engine.toggle_indicator(IndicatorKind::Ema);
    engine.toggle_indicator(IndicatorKind::Bollinger);
    engine.set_show_peaks(false);
    engine.set_show_volume(false);
    engine.set_show_purchase_markers(false);
    engine.resize(800, 600);

    assert_eq!(provider.call_count(), 1);
    assert!(engine.process_pending().is_empty());
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn timeframe_change_starts_a_new_epoch() {
    let provider = Arc::new(GatedProvider::new().with_response(bare_response("AAA", 5, 100.0)));
    let mut engine = common::engine(provider.clone(), Arc::new(InMemoryLedger::new()));

    // No selection yet: stored only
    assert!(engine.set_timeframe(Timeframe::Monthly).is_none());
    assert_eq!(provider.call_count(), 0);

    let first = engine
        .select_instrument(Instrument::new(1, "AAA", "Alpha"))
        .unwrap();
    assert_eq!(first.timeframe, Timeframe::Monthly);
    engine.settle().await;

    let second = engine.set_timeframe(Timeframe::Weekly).unwrap();
    assert_eq!(second.epoch, first.epoch + 1);
    assert!(engine.is_loading());
    engine.settle().await;
    assert_eq!(engine.session().chart.as_ref().unwrap().timeframe, Timeframe::Weekly);

    assert!(engine.set_timeframe(Timeframe::Weekly).is_none());
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn dispose_tears_down_and_ignores_later_work() {
    let provider = Arc::new(GatedProvider::new().with_response(bare_response("AAA", 5, 100.0)));
    let _gate = provider.gate("AAA");
    let mut engine = common::engine(provider, Arc::new(InMemoryLedger::new()));

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.dispose();

    assert!(engine.is_disposed());
    assert!(engine.surface().is_disposed());
    assert!(!engine.is_loading());
    assert!(engine.session().instrument.is_none());

    let calls = engine.surface().calls().len();
    engine.resize(10, 10);
    engine.toggle_indicator(IndicatorKind::Sma50);
    assert!(engine.select_instrument(Instrument::new(1, "AAA", "Alpha")).is_none());
    assert_eq!(engine.surface().calls().len(), calls);
    assert_eq!(engine.surface().calls().last(), Some(&SurfaceCall::Dispose));
}

#[tokio::test]
async fn new_selection_purchases_wait_for_its_chart() {
    let provider = Arc::new(
        GatedProvider::new()
            .with_response(full_response("AAA", 25, 100.0, Some(12)))
            .with_response(full_response("BBB", 25, 500.0, None)),
    );
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.create(lot(1, 12, 10, 100.0)).await.unwrap();
    ledger.create(lot(2, 3, 100, 500.0)).await.unwrap();
    let mut engine = common::engine(provider.clone(), ledger);

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;
    let markers_before = engine.surface().markers().to_vec();
    assert!(markers_before.iter().any(|m| m.time == day(12)));

    let gate_b = provider.gate("BBB");
    let ticket = engine
        .select_instrument(Instrument::new(2, "BBB", "Beta"))
        .unwrap();
    let first = engine.next_update().await.unwrap();
    assert_eq!(
        first,
        EngineEvent::PurchasesApplied {
            epoch: ticket.epoch,
            lots: 1
        }
    );

    // A's chart and markers untouched
    assert_eq!(engine.session().chart.as_ref().unwrap().symbol, "AAA");
    assert_eq!(engine.surface().markers(), markers_before.as_slice());
    assert_eq!(engine.session().purchase_markers[0].date, day(12));

    gate_b.notify_one();
    engine.settle().await;
    assert_eq!(engine.session().chart.as_ref().unwrap().symbol, "BBB");
    let markers = engine.surface().markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].time, day(3));
}

#[tokio::test]
async fn failed_chart_never_mixes_in_new_purchases() {
    let provider = Arc::new(GatedProvider::new().with_response(full_response("AAA", 25, 100.0, Some(12))));
    provider.fail("BBB");
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.create(lot(2, 3, 100, 500.0)).await.unwrap();
    let mut engine = common::engine(provider, ledger);

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;
    let markers_before = engine.surface().markers().to_vec();

    engine.select_instrument(Instrument::new(2, "BBB", "Beta"));
    // The failure ends loading, so the purchase result may still be queued
    let mut events = engine.settle().await;
    while !events
        .iter()
        .any(|e| matches!(e, EngineEvent::PurchasesApplied { .. }))
    {
        events.push(engine.next_update().await.unwrap());
    }
    assert!(events.contains(&EngineEvent::PurchasesApplied {
        epoch: engine.session().request_epoch,
        lots: 1
    }));

    assert_eq!(engine.session().load_state, LoadState::Failed);
    assert_eq!(engine.surface().markers(), markers_before.as_slice());
    assert!(engine.session().purchase_markers.is_empty());
}

#[tokio::test]
async fn same_timeframe_retries_after_failure() {
    let provider = Arc::new(GatedProvider::new().with_response(bare_response("AAA", 5, 100.0)));
    let mut engine = common::engine(provider.clone(), Arc::new(InMemoryLedger::new()));

    engine.select_instrument(Instrument::new(1, "AAA", "Alpha"));
    engine.settle().await;
    let shown = engine.session().chart.as_ref().unwrap().timeframe;
    assert_ne!(shown, Timeframe::Weekly);

    provider.fail("AAA");
    engine.set_timeframe(Timeframe::Weekly).unwrap();
    engine.settle().await;
    assert_eq!(engine.session().load_state, LoadState::Failed);
    assert_eq!(engine.session().chart.as_ref().unwrap().timeframe, shown);

    provider.recover("AAA");
    assert!(engine.set_timeframe(Timeframe::Weekly).is_some());
    engine.settle().await;
    assert_eq!(engine.session().load_state, LoadState::Ready);
    assert_eq!(engine.session().chart.as_ref().unwrap().timeframe, Timeframe::Weekly);
    assert_eq!(provider.call_count(), 3);
}
