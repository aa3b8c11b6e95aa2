mod dataset;
mod marker;
mod session;
mod toggles;

pub use dataset::{BollingerResponse, ChartDataset, ChartResponse};
pub use marker::{Marker, MarkerBand, MarkerShape};
pub use session::{ChartSession, LoadState, LoadTicket};
pub use toggles::{IndicatorToggle, TogglesState};
