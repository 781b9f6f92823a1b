//! Presentation log read from a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use vp_history::PresentationLog;
use vp_history::provider::PresentationLogStore;

pub struct LogFile {
    logs: Vec<PresentationLog>,
}

impl LogFile {
    pub fn open(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("issue reading {}", path.display()))?;
        let logs: Vec<PresentationLog> = serde_json::from_str(&json)
            .with_context(|| format!("issue parsing {}", path.display()))?;
        tracing::debug!(count = logs.len(), path = %path.display(), "loaded presentation log");
        Ok(Self { logs })
    }
}

impl PresentationLogStore for LogFile {
    async fn fetch_presentation_log(&self, id: &str) -> Result<Option<PresentationLog>> {
        Ok(self.logs.iter().find(|log| log.id == id).cloned())
    }

    async fn fetch_presentation_logs(&self) -> Result<Vec<PresentationLog>> {
        let mut logs = self.logs.clone();
        logs.sort_by(|a, b| b.submit_at.cmp(&a.submit_at));
        Ok(logs)
    }
}
