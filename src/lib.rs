#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod render;
pub mod utils;

// Re-export commonly used types outside of crate
pub use config::{ANALYSIS, PERSISTENCE, PLOT_CONFIG};
pub use data::{ChartDataProvider, InMemoryLedger, JsonFileLedger, JsonFileProvider, PurchaseLedger};
pub use domain::{Candle, IndicatorKind, Instrument, InstrumentId, PurchaseLot, Timeframe};
pub use engine::{ChartEngine, EngineEvent};
pub use error::{FetchKind, LoadError};
pub use models::{ChartSession, LoadState, TogglesState};
pub use render::{RecordingSurface, RenderingSurface, SurfaceCall};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `<symbol>_<timeframe>.json` and the purchase ledger
    #[arg(long, default_value = PERSISTENCE.data.directory)]
    pub data_dir: PathBuf,

    /// Ticker symbol, e.g. 7203
    #[arg(long)]
    pub symbol: String,

    /// Ledger id of the instrument
    #[arg(long, default_value_t = 1)]
    pub instrument_id: u64,

    /// 1d, 1wk or 1mo. Falls back to the saved preference
    #[arg(long)]
    pub timeframe: Option<Timeframe>,

    /// Extremum window (candles on each side)
    #[arg(long)]
    pub window: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub no_peaks: bool,

    #[arg(long, default_value_t = false)]
    pub no_purchases: bool,

    #[arg(long, default_value_t = false)]
    pub no_volume: bool,

    /// Overlay to show (repeatable): sma25, sma50, sma75, ema, bollinger
    #[arg(long = "indicator")]
    pub indicators: Vec<IndicatorKind>,

    /// Persist the resulting toggles and timeframe
    #[arg(long, default_value_t = false)]
    pub save_prefs: bool,

    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
