use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::scoring::ScoreReport;

/// One row of the local results history.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub date: String,
    pub test_id: String,
    pub score: u32,
    pub total: u32,
    pub wrong_hotspots: u32,
    pub background_clicks: u32,
    pub elapsed_secs: u64,
}

impl SessionRecord {
    pub fn from_report(test_id: &str, report: &ScoreReport, elapsed_secs: u64) -> Self {
        Self {
            date: Local::now().format("%c").to_string(),
            test_id: test_id.to_string(),
            score: report.points,
            total: report.possible,
            wrong_hotspots: report.wrong_hotspots,
            background_clicks: report.background_clicks,
            elapsed_secs,
        }
    }
}

/// Append-only CSV log of finished sessions.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn append(&self, record: &SessionRecord) -> csv::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, the first write emits a header row
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
