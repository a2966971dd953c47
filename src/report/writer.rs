//! Plain-text QA report, appended to as the run progresses.

use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::aggregator::{ReportEntry, RunSummary};

const RULE: &str = "==================================================";

/// Report file name for a run started at `started`
pub fn report_filename(started: &DateTime<Local>) -> String {
    format!("report_{}.txt", started.format("%Y-%m-%dT%H-%M-%S"))
}

pub fn format_header(started: &DateTime<Local>) -> String {
    format!("QA REPORT - {}\n{}\n\n", started.format("%Y-%m-%d %H:%M:%S"), RULE)
}

/// `{id} [({device})] --> QA PASS|FAIL` followed by the errors, if any
pub fn format_entry(entry: &ReportEntry) -> String {
    let mut text = match &entry.device_name {
        Some(device) => format!("{} ({}) --> QA {}\n", entry.activity_id, device, entry.status),
        None => format!("{} --> QA {}\n", entry.activity_id, entry.status),
    };
    if !entry.errors.is_empty() {
        text.push_str("  Errors:\n");
        for error in &entry.errors {
            text.push_str(&format!("  - {}\n", error));
        }
        text.push('\n');
    }
    text
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "\n{rule}\nSUMMARY:\nTotal activities: {}\nPassed activities: {}\nFailed activities: {}\n{rule}\n",
        summary.total_activities,
        summary.passed_activities,
        summary.failed_activities,
        rule = RULE,
    )
}

/// A report file that receives one entry per (activity, device) pass
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create `{dir}/report_{timestamp}.txt` and write the header
    pub fn create(dir: &Path) -> std::io::Result<Self> {
        let started = Local::now();
        fs::create_dir_all(dir)?;
        let path = dir.join(report_filename(&started));
        fs::write(&path, format_header(&started))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &ReportEntry) -> std::io::Result<()> {
        self.write(&format_entry(entry))
    }

    /// Append the summary block
    pub fn finish(&self, summary: &RunSummary) -> std::io::Result<()> {
        self.write(&format_summary(summary))
    }

    fn write(&self, text: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(text.as_bytes())
    }
}
