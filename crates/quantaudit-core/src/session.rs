//! Session recording for audit runs.
//!
//! Captures a full training-and-audit run to disk for offline analysis:
//! per-epoch metrics as CSV, the final audit snapshot as JSON, and a
//! manifest with timing, machine info, and a content digest.
//!
//! # Storage Format
//!
//! Each session is a directory named `<UTC timestamp>-<task>`:
//!
//! ```text
//! 2026-08-25T142311Z-ghz/
//! ├── session.json    # manifest: task, timing, seed, machine, digest
//! ├── training.csv    # one row per epoch
//! └── snapshot.json   # final audit snapshot (absent when aborted)
//! ```
//!
//! The manifest is written last, so any directory containing one is a
//! complete session. The CSV is flushed after every row; an aborted run
//! keeps everything logged up to the abort.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::snapshot::AuditSnapshot;
use crate::task::TaskKind;
use crate::training::TrainingLog;

/// Manifest schema version.
pub const SESSION_FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Manifest types
// ---------------------------------------------------------------------------

/// Hardware and software info captured with each session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineInfo {
    pub os: String,
    pub arch: String,
    pub chip: Option<String>,
    pub cores: usize,
}

/// Detect machine info for the current host.
pub fn detect_machine_info() -> MachineInfo {
    MachineInfo {
        os: format!("{} {}", std::env::consts::OS, os_version()),
        arch: std::env::consts::ARCH.to_string(),
        chip: detect_chip(),
        cores: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
    }
}

fn os_version() -> String {
    #[cfg(target_os = "macos")]
    {
        if let Ok(out) = std::process::Command::new("sw_vers")
            .arg("-productVersion")
            .output()
        {
            return String::from_utf8_lossy(&out.stdout).trim().to_string();
        }
    }
    #[cfg(target_os = "linux")]
    {
        if let Ok(release) = fs::read_to_string("/proc/sys/kernel/osrelease") {
            return release.trim().to_string();
        }
    }
    String::from("unknown")
}

fn detect_chip() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        let out = std::process::Command::new("sysctl")
            .args(["-n", "machdep.cpu.brand_string"])
            .output()
            .ok()?;
        let name = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if !name.is_empty() {
            return Some(name);
        }
    }
    #[cfg(target_os = "linux")]
    {
        let info = fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in info.lines() {
            if line.starts_with("model name") {
                return line.split(':').nth(1).map(|s| s.trim().to_string());
            }
        }
    }
    None
}

/// Session manifest, serialized as `session.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    pub version: u32,
    /// Random UUID identifying this session.
    pub session_id: String,
    pub task_idx: usize,
    pub label: String,
    /// ISO-8601 UTC timestamps.
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
    /// Epochs logged before the run ended.
    pub epochs: usize,
    /// RNG seed, when the run was seeded.
    pub seed: Option<u64>,
    /// Final verdict string; absent when the run was aborted.
    pub final_verdict: Option<String>,
    /// SHA-256 hex digest of `snapshot.json`; absent when aborted.
    pub snapshot_digest: Option<String>,
    pub machine: MachineInfo,
    pub quantaudit_version: String,
    /// Operator-supplied key/value tags.
    pub tags: HashMap<String, String>,
    /// Free-form operator note.
    pub note: Option<String>,
}

/// Options for a recording session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Root directory sessions are created under.
    pub output_dir: PathBuf,
    /// Seed recorded in the manifest.
    pub seed: Option<u64>,
    /// Key/value tags recorded in the manifest.
    pub tags: HashMap<String, String>,
    /// Operator note recorded in the manifest.
    pub note: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("sessions"),
            seed: None,
            tags: HashMap::new(),
            note: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Writes one audit session to disk.
pub struct SessionWriter {
    dir: PathBuf,
    csv: BufWriter<File>,
    meta: SessionMeta,
    started: Instant,
    epochs: usize,
}

impl SessionWriter {
    /// Create the session directory and open the training log.
    pub fn new(config: &SessionConfig, task: TaskKind) -> io::Result<Self> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let dir = config.output_dir.join(format!(
            "{}-{}",
            format_iso8601_compact(now),
            task.short_name()
        ));
        fs::create_dir_all(&dir)?;

        let mut csv = BufWriter::new(File::create(dir.join("training.csv"))?);
        writeln!(csv, "epoch,loss,acc,precision,recall,f1,validity_score,tp,fp")?;

        let meta = SessionMeta {
            version: SESSION_FORMAT_VERSION,
            session_id: uuid::Uuid::new_v4().to_string(),
            task_idx: task.index(),
            label: task.label().to_string(),
            started_at: format_iso8601(now),
            ended_at: String::new(),
            duration_ms: 0,
            epochs: 0,
            seed: config.seed,
            final_verdict: None,
            snapshot_digest: None,
            machine: detect_machine_info(),
            quantaudit_version: env!("CARGO_PKG_VERSION").to_string(),
            tags: config.tags.clone(),
            note: config.note.clone(),
        };

        log::debug!("session started: {}", dir.display());
        Ok(Self {
            dir,
            csv,
            meta,
            started: Instant::now(),
            epochs: 0,
        })
    }

    /// Append one epoch to the training log.
    pub fn write_epoch(&mut self, entry: &TrainingLog) -> io::Result<()> {
        writeln!(
            self.csv,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{},{}",
            entry.epoch,
            entry.loss,
            entry.acc,
            entry.precision,
            entry.recall,
            entry.f1,
            entry.validity_score,
            entry.confusion.tp,
            entry.confusion.fp
        )?;
        self.csv.flush()?;
        self.epochs += 1;
        Ok(())
    }

    /// Finish the session: write the snapshot (when the run completed)
    /// and then the manifest. Returns the session directory.
    pub fn finish(mut self, snapshot: Option<&AuditSnapshot>) -> io::Result<PathBuf> {
        self.csv.flush()?;

        if let Some(snapshot) = snapshot {
            let json = serde_json::to_string_pretty(snapshot)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            fs::write(self.dir.join("snapshot.json"), &json)?;
            self.meta.snapshot_digest = Some(sha256_hex(json.as_bytes()));
            self.meta.final_verdict = Some(snapshot.final_verdict.to_string());
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.meta.ended_at = format_iso8601(now);
        self.meta.duration_ms = self.started.elapsed().as_millis() as u64;
        self.meta.epochs = self.epochs;

        let meta_json = serde_json::to_string_pretty(&self.meta)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(self.dir.join("session.json"), meta_json)?;

        log::info!("session recorded: {}", self.dir.display());
        Ok(self.dir)
    }

    /// Directory this session writes into.
    pub fn session_dir(&self) -> &Path {
        &self.dir
    }

    /// Epochs written so far.
    pub fn epochs_written(&self) -> usize {
        self.epochs
    }
}

// ---------------------------------------------------------------------------
// Digests and timestamps
// ---------------------------------------------------------------------------

/// Hex-encoded SHA-256 digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        write!(out, "{:02x}", byte).unwrap();
    }
    out
}

/// Format a UNIX duration as `2026-08-25T14:23:11Z`.
pub fn format_iso8601(ts: Duration) -> String {
    let (year, month, day, hour, minute, second) = secs_to_utc(ts.as_secs());
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

/// Format a UNIX duration as `2026-08-25T142311Z` (filesystem-safe).
pub fn format_iso8601_compact(ts: Duration) -> String {
    let (year, month, day, hour, minute, second) = secs_to_utc(ts.as_secs());
    format!("{year:04}-{month:02}-{day:02}T{hour:02}{minute:02}{second:02}Z")
}

fn secs_to_utc(total_secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let days = total_secs / 86_400;
    let rem = total_secs % 86_400;
    let hour = rem / 3600;
    let minute = (rem % 3600) / 60;
    let second = rem % 60;

    let mut year = 1970u64;
    let mut days_left = days;
    loop {
        let year_len = if is_leap(year) { 366 } else { 365 };
        if days_left < year_len {
            break;
        }
        days_left -= year_len;
        year += 1;
    }

    let month_lens: [u64; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };
    let mut month = 1u64;
    for len in month_lens {
        if days_left < len {
            break;
        }
        days_left -= len;
        month += 1;
    }

    (year, month, days_left + 1, hour, minute, second)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
