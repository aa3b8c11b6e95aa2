use serde::{Deserialize, Serialize};

use crate::config::{Price, Quantity};
use crate::domain::{InstrumentId, TimePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(pub u64);

/// One recorded purchase. Owned by the ledger; the engine only reads it.
/// Field names on the wire follow the ledger's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLot {
    pub id: LotId,
    #[serde(rename = "stock_id")]
    pub instrument_id: InstrumentId,
    #[serde(rename = "purchase_date")]
    pub date: TimePoint,
    pub quantity: Quantity,
    #[serde(rename = "purchase_price")]
    pub unit_price: Price,
    #[serde(rename = "notes", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Create request passed through to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseLot {
    pub instrument_id: InstrumentId,
    pub date: TimePoint,
    pub quantity: Quantity,
    pub unit_price: Price,
    pub note: Option<String>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLotPatch {
    pub date: Option<TimePoint>,
    pub quantity: Option<Quantity>,
    pub unit_price: Option<Price>,
    pub note: Option<String>,
}

impl PurchaseLot {
    pub fn from_new(id: LotId, new: NewPurchaseLot) -> Self {
        Self {
            id,
            instrument_id: new.instrument_id,
            date: new.date,
            quantity: new.quantity,
            unit_price: new.unit_price,
            note: new.note,
        }
    }

    pub fn apply(&mut self, patch: PurchaseLotPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if patch.note.is_some() {
            self.note = patch.note;
        }
    }

    /// quantity × unit price
    pub fn cost(&self) -> Price {
        self.quantity as Price * self.unit_price
    }
}
