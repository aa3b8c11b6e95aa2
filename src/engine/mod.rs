mod core;
mod messages;
mod worker;

pub use core::ChartEngine;
pub use messages::EngineEvent;
