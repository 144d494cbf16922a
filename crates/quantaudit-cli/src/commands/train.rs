//! `quantaudit train` — stream a simulated training run epoch by epoch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use quantaudit_core::{
    AuditConfig, SessionConfig, SessionWriter, TrainingConfig, TrainingLog, compose_snapshot_with,
    simulate_epoch_with,
};

pub fn run(
    task_spec: &str,
    epochs: usize,
    seed: Option<u64>,
    interval_ms: u64,
    record: bool,
    tags: &[String],
    note: Option<&str>,
) {
    let task = super::parse_task_or_exit(task_spec);
    let seed = super::resolve_seed(seed);
    let config = TrainingConfig {
        epochs,
        ..TrainingConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    // Parse tags
    let mut tag_map = HashMap::new();
    for tag in tags {
        if let Some((k, v)) = tag.split_once(':') {
            tag_map.insert(k.to_string(), v.to_string());
        } else {
            eprintln!("Warning: ignoring malformed tag '{tag}' (expected key:value)");
        }
    }

    let mut writer = if record {
        let session = SessionConfig {
            seed: Some(seed),
            tags: tag_map,
            note: note.map(str::to_string),
            ..SessionConfig::default()
        };
        match SessionWriter::new(&session, task) {
            Ok(w) => Some(w),
            Err(e) => {
                eprintln!("Error creating session: {e}");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    println!("🔬 Training run");
    println!("  Task:      {} ({})", task.label(), task.index());
    println!("  Epochs:    {epochs}");
    println!("  Seed:      {seed}");
    println!("  Interval:  {interval_ms}ms");
    if let Some(w) = &writer {
        println!("  Output:    {}", w.session_dir().display());
    }
    println!("  Stop:      Ctrl+C (partial runs are kept, not audited)");
    println!();
    println!(
        "{:>5}  {:>7}  {:>7}  {:>7}  {:>7}  {:>9}",
        "epoch", "acc", "loss", "prec", "f1", "validity"
    );
    println!("{}", "-".repeat(52));

    let interval = Duration::from_millis(interval_ms);
    let mut logs: Vec<TrainingLog> = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let entry = simulate_epoch_with(&config, epoch, logs.last(), task, &mut rng);
        println!(
            "{:>5}  {:>7.4}  {:>7.4}  {:>7.4}  {:>7.4}  {:>9.4}",
            entry.epoch, entry.acc, entry.loss, entry.precision, entry.f1, entry.validity_score
        );

        if let Some(w) = writer.as_mut()
            && let Err(e) = w.write_epoch(&entry)
        {
            eprintln!("Error writing epoch: {e}");
        }
        logs.push(entry);

        // Wait out the interval in short slices so Ctrl+C lands promptly.
        if epoch < epochs {
            let deadline = Instant::now() + interval;
            while Instant::now() < deadline && running.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    }

    println!();

    if logs.len() == epochs {
        let snapshot = compose_snapshot_with(&AuditConfig::default(), task, &logs, None, &mut rng);
        println!(
            "Audit: {}  (domain {}, stat {}, p = {:.2})",
            snapshot.final_verdict, snapshot.domain_verdict, snapshot.stat_verdict, snapshot.p_value
        );

        if let Some(w) = writer.take() {
            match w.finish(Some(&snapshot)) {
                Ok(dir) => {
                    println!("Session saved to {}", dir.display());
                    println!("  session.json   — manifest");
                    println!("  training.csv   — per-epoch metrics");
                    println!("  snapshot.json  — final audit snapshot");
                }
                Err(e) => {
                    eprintln!("Error finalizing session: {e}");
                    std::process::exit(1);
                }
            }
        }
    } else {
        println!("Aborted after {} of {epochs} epochs; no audit composed.", logs.len());

        if let Some(w) = writer.take() {
            match w.finish(None) {
                Ok(dir) => {
                    println!("Partial session saved to {}", dir.display());
                    println!("  session.json   — manifest (no verdict)");
                    println!("  training.csv   — epochs logged before the abort");
                }
                Err(e) => {
                    eprintln!("Error finalizing session: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
