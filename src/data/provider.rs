use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::PERSISTENCE;
use crate::domain::Timeframe;
use crate::models::ChartResponse;

/// Source of candle + indicator payloads for one (symbol, timeframe).
#[async_trait]
pub trait ChartDataProvider: Send + Sync {
    async fn fetch_chart(&self, symbol: &str, timeframe: Timeframe) -> Result<ChartResponse>;
}

/// Reads `<directory>/<symbol>_<timeframe>.json`, e.g. `7203_1d.json`.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    directory: PathBuf,
}

impl JsonFileProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.directory
            .join(format!("{}_{}.json", symbol, timeframe.code()))
    }
}

impl Default for JsonFileProvider {
    fn default() -> Self {
        Self::new(PERSISTENCE.data.directory)
    }
}

#[async_trait]
impl ChartDataProvider for JsonFileProvider {
    async fn fetch_chart(&self, symbol: &str, timeframe: Timeframe) -> Result<ChartResponse> {
        let path = self.path_for(symbol, timeframe);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let response = serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(response)
    }
}
