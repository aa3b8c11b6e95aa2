mod format;
mod perf;
mod time_utils;

pub use format::{format_price, format_thousands};
pub use time_utils::{AppInstant, format_elapsed};
