pub mod audit;
pub mod basis;
pub mod classify;
pub mod dashboard;
pub mod server;
pub mod sessions;
pub mod train;
pub mod validate;

use quantaudit_core::TaskKind;
use quantaudit_core::random_seed;
use serde::Serialize;

/// Parse a task argument: a stable index (`0`-`4`) or a short name
/// (`ghz`, `w`, `dicke2`, `cluster`, `random`). Case-insensitive.
pub fn parse_task(s: &str) -> Result<TaskKind, String> {
    let lowered = s.trim().to_lowercase();
    if let Ok(idx) = lowered.parse::<usize>() {
        return TaskKind::from_index(idx)
            .ok_or_else(|| format!("task index {idx} out of range (0-4)"));
    }
    TaskKind::all()
        .into_iter()
        .find(|t| t.short_name() == lowered)
        .ok_or_else(|| format!("unknown task '{s}' (use 0-4 or ghz, w, dicke2, cluster, random)"))
}

/// Parse a task argument or bail out with a usage hint.
pub fn parse_task_or_exit(s: &str) -> TaskKind {
    match parse_task(s) {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Use the given seed, or draw a fresh one from the OS.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(random_seed)
}

/// Write a value as pretty JSON, reporting the path on success.
pub fn write_json<T: Serialize>(value: &T, path: &str, label: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Failed to write {path}: {e}");
            } else {
                println!("\n📄 {label} saved to: {path}");
            }
        }
        Err(e) => eprintln!("Failed to serialize {label}: {e}"),
    }
}
