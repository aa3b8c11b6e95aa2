//! Configuration module for the chart sync engine.

// Can all be private now because we have a public re-export.
mod analysis;
mod debug;
mod persistence;

// Can't be private because we don't re-export everything in it
pub mod plot;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use debug::DEBUG_FLAGS;
pub use persistence::PERSISTENCE;
pub use plot::{OVERLAY_STYLES, OverlayStyle, PLOT_CONFIG, Rgba, overlay_style};

/// Activates the `trace_time!` macro (scope-level timing).
pub const LOG_PERFORMANCE: bool = cfg!(debug_assertions);

/// Domain scalar aliases. Prices are quoted in the instrument's currency.
pub type Price = f64;
/// Share counts and traded volume.
pub type Quantity = u64;
