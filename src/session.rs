//! Artifact layout for a QA run.
//!
//! Failure screenshots land under the screenshots root:
//! `{root}/{activity}/slide{N}_fail.png`, or
//! `{root}/{activity}/{device}/slide{N}_fail.png` when several devices run.

use std::fs;
use std::path::{Path, PathBuf};

/// A run's screenshot directory with its metadata
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique run ID
    pub id: String,
    /// Screenshots root
    pub dir: PathBuf,
}

impl Session {
    /// Create a session rooted at `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            id: generate_session_id(),
            dir: dir.into(),
        }
    }

    /// Create the screenshots root and write run metadata
    pub fn init(&self, devices: &[String]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let metadata = serde_json::json!({
            "id": self.id,
            "created": chrono::Utc::now().to_rfc3339(),
            "host": hostname::get().ok().map(|h| h.to_string_lossy().to_string()),
            "devices": devices,
        });

        let metadata_path = self.dir.join(".session.json");
        fs::write(metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        Ok(())
    }

    /// Directory holding the screenshots of one (activity, device) pass
    pub fn activity_dir(&self, activity_id: &str, device: Option<&str>) -> PathBuf {
        let dir = self.dir.join(sanitize_name(activity_id));
        match device {
            Some(device) => dir.join(sanitize_name(device)),
            None => dir,
        }
    }

    /// Screenshot path for a failed slide (`slide_number` is 1-based)
    pub fn slide_failure_path(
        &self,
        activity_id: &str,
        device: Option<&str>,
        slide_number: usize,
    ) -> PathBuf {
        self.activity_dir(activity_id, device)
            .join(format!("slide{}_fail.png", slide_number))
    }

    /// Write a capture, creating parent directories as needed
    pub fn save_capture(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }

    /// All PNG files written under one (activity, device) pass
    pub fn list_captures(&self, activity_id: &str, device: Option<&str>) -> std::io::Result<Vec<PathBuf>> {
        let dir = self.activity_dir(activity_id, device);
        let mut captures = Vec::new();
        if dir.exists() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map(|e| e == "png").unwrap_or(false) {
                    captures.push(path);
                }
            }
        }
        captures.sort();
        Ok(captures)
    }
}

/// Generate a unique session ID
fn generate_session_id() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("run_{}_{}", timestamp, std::process::id())
}

/// Sanitize a name for use in paths
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
