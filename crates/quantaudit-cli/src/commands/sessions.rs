//! `quantaudit sessions` — list and inspect recorded audit sessions.

use std::path::{Path, PathBuf};

use quantaudit_core::{AuditSnapshot, SessionMeta, sha256_hex};

/// Run the sessions command.
pub fn run(session_path: Option<&str>, dir: &str, verify: bool) {
    if let Some(path) = session_path {
        // Single session mode
        let session_dir = PathBuf::from(path);
        if !session_dir.join("session.json").exists() {
            eprintln!("Not a session directory: {path}");
            eprintln!("Expected session.json in that directory.");
            std::process::exit(1);
        }
        show_session(&session_dir, verify);
    } else {
        list_sessions(dir);
    }
}

/// List all sessions in a directory.
fn list_sessions(dir: &str) {
    let sessions_dir = PathBuf::from(dir);
    if !sessions_dir.exists() {
        println!("No sessions directory found at {dir}");
        println!("Record one first: quantaudit audit ghz --record");
        return;
    }

    let mut sessions: Vec<(PathBuf, SessionMeta)> = Vec::new();

    let entries = match std::fs::read_dir(&sessions_dir) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to read {dir}: {e}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let json_path = path.join("session.json");
        if !json_path.exists() {
            continue;
        }
        match std::fs::read_to_string(&json_path) {
            Ok(contents) => match serde_json::from_str::<SessionMeta>(&contents) {
                Ok(meta) => sessions.push((path, meta)),
                Err(_) => continue,
            },
            Err(_) => continue,
        }
    }

    if sessions.is_empty() {
        println!("No sessions found in {dir}/");
        println!("Record one first: quantaudit audit ghz --record");
        return;
    }

    // Sort by start time (newest first)
    sessions.sort_by(|a, b| b.1.started_at.cmp(&a.1.started_at));

    println!(
        "{:<28} {:<22} {:>6} {:>9}  {}",
        "Session", "Task", "Epochs", "Duration", "Verdict"
    );
    println!("{}", "-".repeat(78));

    for (path, meta) in &sessions {
        let dir_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let verdict = meta.final_verdict.as_deref().unwrap_or("— (aborted)");

        println!(
            "{:<28} {:<22} {:>6} {:>9}  {}",
            truncate(&dir_name, 28),
            truncate(&meta.label, 22),
            meta.epochs,
            format_duration_ms(meta.duration_ms),
            verdict
        );
    }

    println!("\n{} session(s) in {dir}/", sessions.len());
    println!("Run: quantaudit sessions <path> --verify  to check a snapshot digest");
}

/// Show summary info for a single session.
fn show_session(session_dir: &Path, verify: bool) {
    let meta = read_session_meta(session_dir);

    println!("Session: {}", session_dir.display());
    println!("  ID:        {}", meta.session_id);
    println!("  Task:      {} ({})", meta.label, meta.task_idx);
    println!("  Started:   {}", meta.started_at);
    println!("  Ended:     {}", meta.ended_at);
    println!("  Duration:  {}", format_duration_ms(meta.duration_ms));
    println!("  Epochs:    {}", meta.epochs);
    match meta.seed {
        Some(seed) => println!("  Seed:      {seed}"),
        None => println!("  Seed:      — (unseeded)"),
    }
    println!(
        "  Verdict:   {}",
        meta.final_verdict.as_deref().unwrap_or("— (aborted)")
    );
    println!(
        "  Machine:   {} ({}, {} cores)",
        meta.machine.chip.as_deref().unwrap_or("unknown chip"),
        meta.machine.arch,
        meta.machine.cores
    );
    println!("  Version:   {}", meta.quantaudit_version);
    if !meta.tags.is_empty() {
        let mut tags: Vec<String> = meta.tags.iter().map(|(k, v)| format!("{k}:{v}")).collect();
        tags.sort();
        println!("  Tags:      {}", tags.join(", "));
    }
    if let Some(note) = &meta.note {
        println!("  Note:      {note}");
    }
    if let Some(digest) = &meta.snapshot_digest {
        println!("  Digest:    {}…", &digest[..16]);
    }

    let snapshot_path = session_dir.join("snapshot.json");
    if snapshot_path.exists() {
        match std::fs::read_to_string(&snapshot_path) {
            Ok(json) => {
                if let Ok(snapshot) = serde_json::from_str::<AuditSnapshot>(&json) {
                    println!("\n  Snapshot:");
                    println!(
                        "    Final acc:  {:.4} (baseline {:.2})",
                        snapshot.final_acc, snapshot.baseline_acc
                    );
                    println!("    p-value:    {:.2}", snapshot.p_value);
                    println!(
                        "    Domain:     {} @ {:.1}%",
                        snapshot.predicted_domain,
                        snapshot.domain_confidence * 100.0
                    );
                }
                if verify {
                    verify_digest(&meta, &json);
                }
            }
            Err(e) => {
                if verify {
                    eprintln!("Failed to read snapshot.json: {e}");
                    std::process::exit(1);
                }
            }
        }
    } else if verify {
        println!("\n  No snapshot recorded (aborted run); nothing to verify.");
    }
    println!();
}

/// Recompute the snapshot digest and compare against the manifest.
fn verify_digest(meta: &SessionMeta, snapshot_json: &str) {
    let actual = sha256_hex(snapshot_json.as_bytes());
    match meta.snapshot_digest.as_deref() {
        Some(recorded) if recorded == actual => {
            println!("\n  Digest check: ✓ snapshot.json matches the manifest");
        }
        Some(recorded) => {
            println!("\n  Digest check: ✗ MISMATCH");
            println!("    recorded {recorded}");
            println!("    actual   {actual}");
            std::process::exit(1);
        }
        None => {
            println!("\n  Digest check: manifest carries no digest, cannot verify");
        }
    }
}

fn read_session_meta(session_dir: &Path) -> SessionMeta {
    let json_path = session_dir.join("session.json");
    let contents = match std::fs::read_to_string(&json_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read session.json: {e}");
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&contents) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to parse session.json: {e}");
            std::process::exit(1);
        }
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms < 3_600_000 {
        format!("{:.1}m", ms as f64 / 60_000.0)
    } else {
        format!("{:.1}h", ms as f64 / 3_600_000.0)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(850), "850ms");
        assert_eq!(format_duration_ms(2500), "2.5s");
        assert_eq!(format_duration_ms(90_000), "1.5m");
        assert_eq!(format_duration_ms(5_400_000), "1.5h");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 28), "short");
        assert_eq!(
            truncate("a-very-long-session-directory-name", 20),
            "a-very-long-sessi..."
        );
    }
}
