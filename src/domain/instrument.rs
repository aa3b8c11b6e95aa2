use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub u64);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The selected security. Only the fields the engine needs: the ledger is
/// keyed by `id`, the chart provider by `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

impl Instrument {
    pub fn new(id: u64, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: InstrumentId(id),
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{} ({})", self.symbol, self.name)
        }
    }
}
