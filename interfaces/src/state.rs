use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Number of mailbox identifiers kept between runs.
pub const LEDGER_CAPACITY: usize = 500;

/// Backing storage for the processed-message ledger.
pub trait LedgerStore {
    /// Identifiers from previous runs, oldest first.
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, ids: &[String]) -> Result<()>;
}

/// One identifier per line in a plain text file.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for FileLedger {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No ledger yet, starting empty");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger {}", self.path.display()))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        let tmp = self.temp_path();
        let mut content = ids.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write ledger {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to move {} into place at {}", tmp.display(), self.path.display())
        })?;
        Ok(())
    }
}

/// Ledger storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    ids: Mutex<Vec<String>>,
}

impl MemoryLedger {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids: Mutex::new(ids) }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.ids.lock().map(|ids| ids.clone()).unwrap_or_default()
    }
}

impl LedgerStore for MemoryLedger {
    fn load(&self) -> Result<Vec<String>> {
        let ids = self
            .ids
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory ledger lock poisoned"))?;
        Ok(ids.clone())
    }

    fn save(&self, new_ids: &[String]) -> Result<()> {
        let mut ids = self
            .ids
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory ledger lock poisoned"))?;
        *ids = new_ids.to_vec();
        Ok(())
    }
}

/// In-memory view of the ledger during one run.
#[derive(Debug, Clone, Default)]
pub struct ProcessedLedger {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ProcessedLedger {
    pub fn load_from(store: &dyn LedgerStore) -> Result<Self> {
        let mut ledger = Self::default();
        for id in store.load()? {
            ledger.record(id);
        }
        info!(count = ledger.len(), "Loaded processed message ids");
        Ok(ledger)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Record `id`; ids already present keep their original position.
    pub fn record(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.seen.insert(id.clone()) {
            self.order.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The most recent [`LEDGER_CAPACITY`] identifiers, oldest first.
    pub fn recent(&self) -> &[String] {
        let start = self.order.len().saturating_sub(LEDGER_CAPACITY);
        &self.order[start..]
    }

    pub fn save_to(&self, store: &dyn LedgerStore) -> Result<()> {
        let recent = self.recent();
        store.save(recent)?;
        info!(count = recent.len(), "Saved processed message ids");
        Ok(())
    }
}
