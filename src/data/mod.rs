mod ledger;
mod preferences_io;
mod provider;

pub use {
    ledger::{InMemoryLedger, JsonFileLedger, PurchaseLedger},
    preferences_io::{Preferences, load_preferences, save_preferences},
    provider::{ChartDataProvider, JsonFileProvider},
};
