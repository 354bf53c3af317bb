use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{ChartImage, ChartKind, VideoId};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// `{video_id}-{chart}.png`
pub fn chart_filename(video_id: &VideoId, kind: ChartKind) -> String {
    format!("{video_id}-{}.png", kind.name())
}

/// `{video_id}-report.json`
pub fn report_filename(video_id: &VideoId) -> String {
    format!("{video_id}-report.json")
}

/// Ensure the run artifact directory exists and accepts new files.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        }
        Err(err) => return Err(PersistError::OutputDir(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Stores one video's charts and report. Each file lands through a temp file
/// and a rename, so a reader sees either the old artifact or the new one.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Prepares `dir`, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        ensure_output_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_chart(&self, video_id: &VideoId, image: &ChartImage) -> Result<PathBuf, PersistError> {
        self.write_atomic(&chart_filename(video_id, image.kind), &image.bytes)
    }

    pub fn write_report(&self, video_id: &VideoId, json: &str) -> Result<PathBuf, PersistError> {
        self.write_atomic(&report_filename(video_id), json.as_bytes())
    }

    fn write_atomic(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;

        // persist() does not overwrite on every platform.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
