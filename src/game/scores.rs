//=========================================================================
// Score Persistence
//=========================================================================
//
// The best result ever achieved: fewest clicks, and fastest time.
//
// File format (one line):
//   "<clicks>:<elapsed ticks>"    current
//   "<clicks>"                    legacy, no time recorded
//
// Reading never fails: a missing or unreadable file yields the default
// record. Writes go to a sibling temp file first and are renamed into
// place, so a crash mid-write leaves the previous record intact.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

//=== Constants ===========================================================

/// Click count of the default record (one per cell of a 12 x 12 grid).
pub const DEFAULT_BEST_CLICKS: u32 = 144;

/// Elapsed value meaning "no time recorded yet".
pub const NO_BEST_TIME: u64 = u64::MAX;

//=== ScoreError ==========================================================

#[derive(Debug)]
pub enum ScoreError {
    Io(io::Error),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "score file I/O failed: {}", err),
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for ScoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

//=== Verdict =============================================================

/// How a finished game compares with the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Fewer clicks than ever before.
    NewHighScore,

    /// Not fewer clicks, but faster than ever before.
    NewBestTime,

    /// Neither.
    Unchanged,
}

//=== ScoreRecord =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRecord {
    pub best_clicks: u32,
    pub best_elapsed: u64,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            best_clicks: DEFAULT_BEST_CLICKS,
            best_elapsed: NO_BEST_TIME,
        }
    }
}

impl ScoreRecord {
    pub fn new(best_clicks: u32, best_elapsed: u64) -> Self {
        Self {
            best_clicks,
            best_elapsed,
        }
    }

    /// True once a completed game has recorded a time.
    pub fn has_time(&self) -> bool {
        self.best_elapsed != NO_BEST_TIME
    }

    /// Compares a finished game against this record and returns the
    /// verdict with the record that should be stored afterwards.
    ///
    /// Clicks decide first. A new high score stores the game's own time;
    /// a new best time keeps the existing click record.
    pub fn evaluate(&self, clicks: u32, elapsed: u64) -> (Verdict, ScoreRecord) {
        if clicks < self.best_clicks {
            (Verdict::NewHighScore, ScoreRecord::new(clicks, elapsed))
        } else if elapsed < self.best_elapsed {
            (
                Verdict::NewBestTime,
                ScoreRecord::new(self.best_clicks, elapsed),
            )
        } else {
            (Verdict::Unchanged, *self)
        }
    }

    //--- Codec ------------------------------------------------------------

    pub fn encode(&self) -> String {
        format!("{}:{}", self.best_clicks, self.best_elapsed)
    }

    /// Parses either file format. `None` if the click count is unreadable.
    ///
    /// An unreadable time is treated as no time recorded.
    pub fn decode(text: &str) -> Option<Self> {
        let text = text.trim();
        let (clicks, elapsed) = match text.split_once(':') {
            Some((clicks, elapsed)) => (clicks, elapsed.trim().parse().ok()),
            None => (text, None),
        };

        let best_clicks = clicks.trim().parse().ok()?;
        Some(Self::new(best_clicks, elapsed.unwrap_or(NO_BEST_TIME)))
    }
}

//=== ScoreStore ==========================================================

/// Where the record lives.
pub trait ScoreStore {
    /// Current record, or the default when none can be read.
    fn read(&self) -> ScoreRecord;

    fn write(&self, record: ScoreRecord) -> Result<(), ScoreError>;
}

//=== FileScoreStore ======================================================

/// Record stored in a small text file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
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
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ScoreStore for FileScoreStore {
    fn read(&self) -> ScoreRecord {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(target: "scores", "No score file at {}", self.path.display());
                return ScoreRecord::default();
            }
            Err(err) => {
                warn!(target: "scores", "Cannot read {}: {}", self.path.display(), err);
                return ScoreRecord::default();
            }
        };

        ScoreRecord::decode(&text).unwrap_or_else(|| {
            warn!(
                target: "scores",
                "Malformed score file {}, using defaults",
                self.path.display()
            );
            ScoreRecord::default()
        })
    }

    fn write(&self, record: ScoreRecord) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, record.encode())?;
        fs::rename(&temp, &self.path)?;

        info!(
            target: "scores",
            "Saved record {} clicks to {}",
            record.best_clicks,
            self.path.display()
        );
        Ok(())
    }
}

//=== MemoryScoreStore ====================================================

#[cfg(test)]
pub(crate) use memory::MemoryScoreStore;


//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    //=====================================================================
    // Evaluation
    //=====================================================================

    #[test]
    fn fewer_clicks_is_high_score_with_new_time() {
        let record = ScoreRecord::new(5, 1000);
        assert_eq!(
            record.evaluate(3, 1200),
            (Verdict::NewHighScore, ScoreRecord::new(3, 1200))
        );
    }

    #[test]
    fn faster_without_fewer_clicks_is_best_time() {
        let record = ScoreRecord::new(5, 1000);
        assert_eq!(
            record.evaluate(6, 900),
            (Verdict::NewBestTime, ScoreRecord::new(5, 900))
        );
        assert_eq!(
            record.evaluate(5, 900),
            (Verdict::NewBestTime, ScoreRecord::new(5, 900)),
            "Equal clicks are not a high score"
        );
    }

    #[test]
    fn slower_and_more_clicks_changes_nothing() {
        let record = ScoreRecord::new(5, 1000);
        assert_eq!(record.evaluate(6, 1200), (Verdict::Unchanged, record));
        assert_eq!(record.evaluate(5, 1000), (Verdict::Unchanged, record));
    }

    #[test]
    fn default_record_accepts_any_finished_time() {
        let record = ScoreRecord::default();
        assert!(!record.has_time());
        let (verdict, next) = record.evaluate(200, 10);
        assert_eq!(verdict, Verdict::NewBestTime);
        assert_eq!(next, ScoreRecord::new(DEFAULT_BEST_CLICKS, 10));
    }

    //=====================================================================
    // Codec
    //=====================================================================

    #[test]
    fn decodes_both_formats() {
        assert_eq!(ScoreRecord::decode("12:450\n"), Some(ScoreRecord::new(12, 450)));
        assert_eq!(ScoreRecord::decode("17"), Some(ScoreRecord::new(17, NO_BEST_TIME)));
        assert_eq!(ScoreRecord::decode(" 9 : abc "), Some(ScoreRecord::new(9, NO_BEST_TIME)));
    }

    #[test]
    fn rejects_unreadable_clicks() {
        assert_eq!(ScoreRecord::decode(""), None);
        assert_eq!(ScoreRecord::decode("many"), None);
        assert_eq!(ScoreRecord::decode("x:10"), None);
    }

    #[test]
    fn encode_is_current_format() {
        assert_eq!(ScoreRecord::new(12, 450).encode(), "12:450");
    }

    //=====================================================================
    // File Store
    //=====================================================================

    #[test]
    fn missing_file_reads_default() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::new(dir.path().join("none.txt"));
        assert_eq!(store.read(), ScoreRecord::default());
    }

    #[test]
    fn malformed_file_reads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "garbage").unwrap();
        assert_eq!(FileScoreStore::new(path).read(), ScoreRecord::default());
    }

    #[test]
    fn legacy_file_is_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_score.txt");
        fs::write(&path, "23\n").unwrap();
        assert_eq!(
            FileScoreStore::new(path).read(),
            ScoreRecord::new(23, NO_BEST_TIME)
        );
    }

    #[test]
    fn write_creates_directories_and_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::new(dir.path().join("data").join("high_score.txt"));

        store.write(ScoreRecord::new(20, 640)).unwrap();

        assert_eq!(store.read(), ScoreRecord::new(20, 640));
        assert!(!store.temp_path().exists(), "Temp file is renamed away");
    }

    #[test]
    fn write_replaces_previous_record() {
        let dir = tempdir().unwrap();
        let store = FileScoreStore::new(dir.path().join("high_score.txt"));

        store.write(ScoreRecord::new(30, 900)).unwrap();
        store.write(ScoreRecord::new(25, 800)).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "25:800");
    }

    #[test]
    fn write_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = FileScoreStore::new(blocker.join("high_score.txt"));

        assert!(matches!(
            store.write(ScoreRecord::default()),
            Err(ScoreError::Io(_))
        ));
    }
}
