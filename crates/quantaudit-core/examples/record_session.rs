//! Record a full audit session to disk.
//!
//! Writes per-epoch metrics, the final snapshot, and a digest-carrying
//! manifest under `sessions/`.
//!
//! Run: `cargo run --example record_session`

use quantaudit_core::{
    AuditConfig, SessionConfig, SessionWriter, TaskKind, compose_snapshot_with, run_training,
    TrainingConfig,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> std::io::Result<()> {
    let task = TaskKind::ClusterVsNonCluster;
    let seed = 42;
    let config = SessionConfig {
        seed: Some(seed),
        note: Some("demo recording".to_string()),
        ..SessionConfig::default()
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = SessionWriter::new(&config, task)?;
    println!("Recording to {}", writer.session_dir().display());

    let logs = run_training(task, &TrainingConfig::default(), &mut rng);
    for entry in &logs {
        writer.write_epoch(entry)?;
    }

    let snapshot = compose_snapshot_with(&AuditConfig::default(), task, &logs, None, &mut rng);
    println!("Final verdict: {}", snapshot.final_verdict);

    let dir = writer.finish(Some(&snapshot))?;
    println!("Session complete: {}", dir.display());
    Ok(())
}
