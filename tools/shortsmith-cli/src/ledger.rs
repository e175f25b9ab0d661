//! Ledger of already-produced titles, so batch runs never redo work.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use shortsmith_common::error::SmithResult;

/// Tracks which titles have already been rendered.
pub trait ProcessedLedger {
    fn seen(&self, title: &str) -> bool;
    fn mark(&mut self, title: &str) -> SmithResult<()>;
}

/// Line-per-title ledger file. Marks are appended immediately so a crash
/// mid-batch never forgets finished work.
pub struct FileLedger {
    path: PathBuf,
    titles: HashSet<String>,
}

impl FileLedger {
    pub fn open(path: impl Into<PathBuf>) -> SmithResult<Self> {
        let path = path.into();
        let titles = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, titles })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }
}

impl ProcessedLedger for FileLedger {
    fn seen(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    fn mark(&mut self, title: &str) -> SmithResult<()> {
        if !self.titles.insert(title.to_string()) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{title}")?;
        Ok(())
    }
}
