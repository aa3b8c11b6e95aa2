//! Purchase-lot storage. The engine only lists; create/update/delete are
//! passed through and followed by a reload.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;

use crate::domain::{InstrumentId, LotId, NewPurchaseLot, PurchaseLot, PurchaseLotPatch};

#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    async fn list(&self, instrument: InstrumentId) -> Result<Vec<PurchaseLot>>;
    async fn create(&self, lot: NewPurchaseLot) -> Result<PurchaseLot>;
    async fn update(&self, id: LotId, patch: PurchaseLotPatch) -> Result<PurchaseLot>;
    async fn delete(&self, id: LotId) -> Result<()>;
}

/// Volatile ledger. Ids are handed out monotonically and never reused.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    lots: Mutex<Vec<PurchaseLot>>,
    last_id: AtomicU64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing lots. Later ids continue after the largest one.
    pub fn with_lots(lots: Vec<PurchaseLot>) -> Self {
        let last = lots.iter().map(|l| l.id.0).max().unwrap_or(0);
        Self {
            lots: Mutex::new(lots),
            last_id: AtomicU64::new(last),
        }
    }

    fn lots(&self) -> Result<std::sync::MutexGuard<'_, Vec<PurchaseLot>>> {
        self.lots.lock().map_err(|_| anyhow!("purchase ledger lock poisoned"))
    }
}

#[async_trait]
impl PurchaseLedger for InMemoryLedger {
    async fn list(&self, instrument: InstrumentId) -> Result<Vec<PurchaseLot>> {
        Ok(self
            .lots()?
            .iter()
            .filter(|l| l.instrument_id == instrument)
            .cloned()
            .collect())
    }

    async fn create(&self, lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let id = LotId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let lot = PurchaseLot::from_new(id, lot);
        self.lots()?.push(lot.clone());
        Ok(lot)
    }

    async fn update(&self, id: LotId, patch: PurchaseLotPatch) -> Result<PurchaseLot> {
        let mut lots = self.lots()?;
        let lot = lots
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("purchase lot {} not found", id.0))?;
        lot.apply(patch);
        Ok(lot.clone())
    }

    async fn delete(&self, id: LotId) -> Result<()> {
        let mut lots = self.lots()?;
        let before = lots.len();
        lots.retain(|l| l.id != id);
        if lots.len() == before {
            return Err(anyhow!("purchase lot {} not found", id.0));
        }
        Ok(())
    }
}

/// Ledger backed by a JSON array on disk. Every mutation rewrites the file.
#[derive(Debug)]
pub struct JsonFileLedger {
    path: PathBuf,
    // Serialises read-modify-write cycles
    guard: tokio::sync::Mutex<()>,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<PurchaseLot>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("checking {}", self.path.display()))?;
        if !exists {
            return Ok(Vec::new());
        }
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("decoding {}", self.path.display()))
    }

    async fn save(&self, lots: &[PurchaseLot]) -> Result<()> {
        let json = serde_json::to_vec_pretty(lots)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

#[async_trait]
impl PurchaseLedger for JsonFileLedger {
    async fn list(&self, instrument: InstrumentId) -> Result<Vec<PurchaseLot>> {
        let _guard = self.guard.lock().await;
        let mut lots = self.load().await?;
        lots.retain(|l| l.instrument_id == instrument);
        Ok(lots)
    }

    async fn create(&self, lot: NewPurchaseLot) -> Result<PurchaseLot> {
        let _guard = self.guard.lock().await;
        let mut lots = self.load().await?;
        let id = LotId(lots.iter().map(|l| l.id.0).max().unwrap_or(0) + 1);
        let lot = PurchaseLot::from_new(id, lot);
        lots.push(lot.clone());
        self.save(&lots).await?;
        Ok(lot)
    }

    async fn update(&self, id: LotId, patch: PurchaseLotPatch) -> Result<PurchaseLot> {
        let _guard = self.guard.lock().await;
        let mut lots = self.load().await?;
        let lot = lots
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("purchase lot {} not found", id.0))?;
        lot.apply(patch);
        let updated = lot.clone();
        self.save(&lots).await?;
        Ok(updated)
    }

    async fn delete(&self, id: LotId) -> Result<()> {
        let _guard = self.guard.lock().await;
        let mut lots = self.load().await?;
        let before = lots.len();
        lots.retain(|l| l.id != id);
        if lots.len() == before {
            return Err(anyhow!("purchase lot {} not found", id.0));
        }
        self.save(&lots).await
    }
}
