use std::panic;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tabled::{Table, Tabled, settings::Style};

use chart_sync::config::AnalysisConfig;
use chart_sync::data::{Preferences, load_preferences, save_preferences};
use chart_sync::utils::{AppInstant, format_elapsed, format_price, format_thousands};
use chart_sync::{
    ChartEngine, Cli, EngineEvent, Instrument, JsonFileLedger, JsonFileProvider, PERSISTENCE,
    RecordingSurface,
};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn init_log(verbose: bool) {
    let (global_level, my_code_level) = if verbose {
        (log::LevelFilter::Info, log::LevelFilter::Debug)
    } else if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), my_code_level)
        .init();
}

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let args = Cli::parse();
    init_log(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let start = AppInstant::now();

    // 1. Preferences, then CLI overrides
    let mut prefs = load_preferences(None).unwrap_or_else(|e| {
        log::warn!("Ignoring saved preferences: {:#}", e);
        Preferences::default()
    });
    if let Some(timeframe) = args.timeframe {
        prefs.timeframe = timeframe;
    }
    for kind in &args.indicators {
        prefs.toggles.set_indicator_visible(*kind, true);
    }
    prefs.toggles.show_peaks &= !args.no_peaks;
    prefs.toggles.show_purchase_markers &= !args.no_purchases;
    prefs.toggles.show_volume &= !args.no_volume;

    // 2. Sources
    let provider = Arc::new(JsonFileProvider::new(&args.data_dir));
    let ledger = Arc::new(JsonFileLedger::new(
        args.data_dir.join(PERSISTENCE.data.purchases_filename),
    ));

    // 3. Engine against a headless surface
    let mut engine = ChartEngine::new(RecordingSurface::new(), provider, ledger)
        .with_preferences(prefs.timeframe, prefs.toggles.clone());
    if let Some(window) = args.window {
        engine = engine.with_analysis(AnalysisConfig {
            extremum_window: window,
        });
    }

    let instrument = Instrument::new(args.instrument_id, &args.symbol, &args.symbol);
    engine.select_instrument(instrument);

    for event in engine.settle().await {
        if let EngineEvent::LoadFailed { message, .. } = event {
            log::error!("{}", message);
        }
    }

    // 4. Report
    let session = engine.session();
    let surface = engine.surface();
    let last_close = session
        .chart
        .as_ref()
        .and_then(|c| c.candles.last())
        .map(|c| format_price(c.close))
        .unwrap_or_else(|| "-".to_string());
    let total_volume: u64 = surface.volume().iter().map(|b| b.value).sum();

    let rows = vec![
        SummaryRow {
            item: "Symbol",
            value: format!("{} ({})", args.symbol, session.timeframe.label()),
        },
        SummaryRow {
            item: "State",
            value: session.load_state.to_string(),
        },
        SummaryRow {
            item: "Candles",
            value: surface.candles().len().to_string(),
        },
        SummaryRow {
            item: "Last close",
            value: last_close,
        },
        SummaryRow {
            item: "Volume shown",
            value: format_thousands(total_volume as i64),
        },
        SummaryRow {
            item: "Peaks",
            value: session.extrema.peaks.len().to_string(),
        },
        SummaryRow {
            item: "Valleys",
            value: session.extrema.valleys.len().to_string(),
        },
        SummaryRow {
            item: "Purchase days",
            value: session.purchase_markers.len().to_string(),
        },
        SummaryRow {
            item: "Markers",
            value: surface.markers().len().to_string(),
        },
        SummaryRow {
            item: "Overlays",
            value: surface
                .overlay_keys()
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        },
        SummaryRow {
            item: "Elapsed",
            value: format_elapsed(start),
        },
    ];

    println!("{}", Table::new(rows).with(Style::rounded()));

    if let Some(error) = &session.last_error {
        println!("Load failed: {}", error);
    }

    // 5. Persist
    if args.save_prefs {
        let prefs = Preferences {
            timeframe: session.timeframe,
            toggles: session.toggles.clone(),
        };
        save_preferences(&prefs, None)?;
    }

    Ok(())
}
