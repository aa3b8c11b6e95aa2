//! Groups purchase lots into one display marker per purchase date.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::{Price, Quantity};
use crate::domain::{InstrumentId, PurchaseLot, TimePoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseMarker {
    pub date: TimePoint,
    pub total_quantity: Quantity,
    /// Σ(quantity × unit price) / Σ quantity
    pub weighted_average_price: Price,
    pub lot_count: usize,
}

/// One marker per distinct date among `instrument`'s lots. Lots belonging to
/// other instruments are ignored. Output order carries no meaning.
pub fn aggregate_purchases(lots: &[PurchaseLot], instrument: InstrumentId) -> Vec<PurchaseMarker> {
    lots.iter()
        .filter(|lot| lot.instrument_id == instrument)
        .into_group_map_by(|lot| lot.date)
        .into_iter()
        .map(|(date, group)| summarize(date, &group))
        .collect()
}

fn summarize(date: TimePoint, group: &[&PurchaseLot]) -> PurchaseMarker {
    let total_quantity: Quantity = group.iter().map(|lot| lot.quantity).sum();
    let total_cost: Price = group.iter().map(|lot| lot.cost()).sum();

    // All-zero quantities would divide by zero; fall back to the plain mean.
    let weighted_average_price = if total_quantity > 0 {
        total_cost / total_quantity as Price
    } else {
        group.iter().map(|lot| lot.unit_price).sum::<Price>() / group.len() as Price
    };

    PurchaseMarker {
        date,
        total_quantity,
        weighted_average_price,
        lot_count: group.len(),
    }
}
