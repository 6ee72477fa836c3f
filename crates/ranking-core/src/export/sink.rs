use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Destination for an exported file.
pub trait DownloadSink {
    fn deliver(&mut self, file_name: &str, contents: &str) -> Result<()>;
}

/// Writes exported files into a directory, creating it when missing.
pub struct DirectorySink {
    base_dir: PathBuf,
    last_written: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            last_written: None,
        }
    }

    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.base_dir.join(file_name);
        fs::write(&path, contents)?;
        self.last_written = Some(path);
        Ok(())
    }
}
