use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Aggregation granularity of the candle series, as understood by the provider.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Timeframe {
    #[default]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    Daily,
    #[strum(serialize = "1wk")]
    #[serde(rename = "1wk")]
    Weekly,
    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    Monthly,
}

impl Timeframe {
    /// Wire code sent to the provider (`1d`, `1wk`, `1mo`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip_through_from_str() {
        for tf in Timeframe::iter() {
            assert_eq!(Timeframe::from_str(tf.code()).unwrap(), tf);
            assert_eq!(tf.to_string(), tf.code());
        }
        assert!(Timeframe::from_str("4h").is_err());
    }

    #[test]
    fn serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&Timeframe::Weekly).unwrap(), "\"1wk\"");
        let tf: Timeframe = serde_json::from_str("\"1mo\"").unwrap();
        assert_eq!(tf, Timeframe::Monthly);
    }
}
