/// Monotonic clock that also works in browsers.
pub type AppInstant = web_time::Instant;

pub fn format_elapsed(start: AppInstant) -> String {
    let micros = start.elapsed().as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else {
        format!("{:.2}ms", micros as f64 / 1000.0)
    }
}
