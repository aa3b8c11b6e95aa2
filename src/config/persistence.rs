//! File persistence configuration

/// Configuration for user preference persistence
pub struct PreferencesPersistenceConfig {
    /// Path for saving/loading toggle state and timeframe
    pub path: &'static str,
}

/// Configuration for the JSON-file data sources used by the headless driver
pub struct DataPersistenceConfig {
    /// Default directory holding `<symbol>_<timeframe>.json` chart payloads
    pub directory: &'static str,
    /// Purchase ledger file name inside `directory`
    pub purchases_filename: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub preferences: PreferencesPersistenceConfig,
    pub data: DataPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    preferences: PreferencesPersistenceConfig {
        path: ".chart_prefs.json",
    },
    data: DataPersistenceConfig {
        directory: "chart_data",
        purchases_filename: "purchases.json",
    },
};
