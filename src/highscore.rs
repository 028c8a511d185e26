//! Highscore persistence.  The only state that outlives a session is one
//! non-negative integer.

use std::io;
use std::path::{Path, PathBuf};

pub trait HighscoreStore {
    /// Stored highscore, or 0 if there is none or it cannot be parsed.
    fn read(&self) -> u32;
    fn write(&mut self, score: u32) -> io::Result<()>;
}

/// Highscore kept as decimal text in a file.
#[derive(Clone, Debug)]
pub struct FileHighscore {
    path: PathBuf,
}

impl FileHighscore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighscoreStore for FileHighscore {
    fn read(&self) -> u32 {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.lines().next().and_then(|l| l.trim().parse().ok()))
            .unwrap_or(0)
    }

    fn write(&mut self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, score.to_string())
    }
}

/// In-memory store, counting writes.
#[derive(Clone, Debug, Default)]
pub struct MemoryHighscore {
    pub value: Option<u32>,
    pub writes: usize,
}

impl MemoryHighscore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }
}

impl HighscoreStore for MemoryHighscore {
    fn read(&self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn write(&mut self, score: u32) -> io::Result<()> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}
