//! Persistence of run reports to the output directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::OutputConfig;

use super::render::render_text;
use super::types::RunReport;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes the JSON record and the text rendering of a report.
#[derive(Debug, Clone)]
pub struct ReportStore {
    results_path: PathBuf,
    report_path: PathBuf,
}

impl ReportStore {
    pub fn new(results_path: PathBuf, report_path: PathBuf) -> Self {
        Self {
            results_path,
            report_path,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.results_path(), config.report_path())
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Persist both files, creating parent directories as needed.
    pub async fn save(&self, report: &RunReport) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(report)?;
        write_file(&self.results_path, json).await?;
        write_file(&self.report_path, render_text(report)).await?;

        info!(
            "Saved run {} to {} and {}",
            report.run_id,
            self.results_path.display(),
            self.report_path.display()
        );
        Ok(())
    }

    /// Reload the JSON record written by [`save`](Self::save).
    pub async fn load(&self) -> Result<RunReport, ReportError> {
        load_report(&self.results_path).await
    }
}

/// Read a persisted report record.
pub async fn load_report(path: &Path) -> Result<RunReport, ReportError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&raw)?)
}

async fn write_file(path: &Path, contents: String) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_err)
}
