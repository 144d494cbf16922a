use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quantaudit_core::{
    AuditConfig, AuditSnapshot, DomainVerdict, FinalVerdict, SessionConfig, SessionWriter,
    StatVerdict, TaskKind, TrainingConfig, TrainingLog, compose_snapshot_with, run_training,
};

use crate::ingest::{self, DatasetProfile};

/// Options for the audit command.
pub struct AuditCommandConfig<'a> {
    pub task: Option<&'a str>,
    pub all: bool,
    pub dataset: Option<&'a str>,
    pub seed: Option<u64>,
    pub epochs: usize,
    pub json: bool,
    pub output_path: Option<&'a str>,
    pub record: bool,
}

pub fn run(config: AuditCommandConfig) {
    let tasks: Vec<TaskKind> = if config.all {
        TaskKind::all().to_vec()
    } else if let Some(spec) = config.task {
        vec![super::parse_task_or_exit(spec)]
    } else {
        eprintln!("Specify a task (0-4 or ghz, w, dicke2, cluster, random) or --all.");
        std::process::exit(1);
    };

    let profile = config.dataset.map(|path| {
        match ingest::ingest_file(Path::new(path)) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("Failed to read dataset {path}: {e}");
                std::process::exit(1);
            }
        }
    });

    let seed = super::resolve_seed(config.seed);
    let training = TrainingConfig {
        epochs: config.epochs,
        ..TrainingConfig::default()
    };

    if !config.json {
        println!(
            "🔬 Auditing {} task(s), {} epochs each (seed {seed})\n",
            tasks.len(),
            config.epochs
        );
        if let Some(profile) = &profile {
            print_profile(profile);
        }
    }

    // One RNG for the whole invocation keeps --all runs replayable from
    // a single seed.
    let mut rng = StdRng::seed_from_u64(seed);
    let mut snapshots: Vec<AuditSnapshot> = Vec::with_capacity(tasks.len());

    for task in tasks {
        let logs = run_training(task, &training, &mut rng);

        let snapshot = compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &logs,
            profile.as_ref().map(|p| &p.meta),
            &mut rng,
        );

        if config.record {
            record_session(task, seed, &logs, &snapshot, config.json);
        }
        if !config.json {
            print_breakdown(task, &logs, &snapshot);
        }
        snapshots.push(snapshot);
    }

    if !config.json && snapshots.len() > 1 {
        print_summary(&snapshots);
    }

    if config.json {
        let json = if config.all {
            serde_json::to_string_pretty(&snapshots)
        } else {
            serde_json::to_string_pretty(&snapshots[0])
        };
        match json {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize snapshots: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Some(path) = config.output_path {
        if config.all {
            super::write_json(&snapshots, path, "Audit snapshots");
        } else {
            super::write_json(&snapshots[0], path, "Audit snapshot");
        }
    }
}

fn record_session(
    task: TaskKind,
    seed: u64,
    logs: &[TrainingLog],
    snapshot: &AuditSnapshot,
    quiet: bool,
) {
    let session = SessionConfig {
        seed: Some(seed),
        ..SessionConfig::default()
    };
    let result = SessionWriter::new(&session, task).and_then(|mut writer| {
        for entry in logs {
            writer.write_epoch(entry)?;
        }
        writer.finish(Some(snapshot))
    });
    match result {
        Ok(dir) => {
            if !quiet {
                println!("  Session recorded: {}\n", dir.display());
            }
        }
        Err(e) => eprintln!("Failed to record session: {e}"),
    }
}

fn print_profile(profile: &DatasetProfile) {
    let meta = &profile.meta;
    println!(
        "📄 Dataset '{}': {} lines, {} values scanned",
        profile.name, profile.line_count, profile.values_scanned
    );
    println!(
        "   semantic {:.2}  max|v| {:.3}  variance {:.3}  complex {}  claimed dim {}",
        meta.semantic_score,
        meta.max_val,
        meta.variance,
        if meta.is_complex { "yes" } else { "no" },
        meta.size
    );
    println!("   sha256 {}…\n", &profile.fingerprint[..16]);
}

fn print_breakdown(task: TaskKind, logs: &[TrainingLog], snapshot: &AuditSnapshot) {
    let final_mark = match snapshot.final_verdict {
        FinalVerdict::Valid => "VALID ✓",
        FinalVerdict::Invalid => "INVALID ✗",
    };

    println!("{}", "=".repeat(60));
    println!("Task {}: {}", task.index(), task.label());
    println!("{}", "-".repeat(60));

    if let Some(last) = logs.last() {
        println!(
            "  {:<14} {} epochs   acc {:.3}   loss {:.3}   f1 {:.3}",
            "Training", last.epoch, last.acc, last.loss, last.f1
        );
    } else {
        println!("  {:<14} no epochs (audited as accuracy 0)", "Training");
    }

    println!(
        "  {:<14} {:<15} {} @ {:.1}%",
        "Domain gate",
        snapshot.domain_verdict.to_string(),
        snapshot.predicted_domain,
        snapshot.domain_confidence * 100.0
    );
    for reason in &snapshot.domain_reasons {
        println!("  {:<14} ✗ {}", "", reason);
    }

    println!(
        "  {:<14} {:<15} p = {:.2}   null mean {:.4}",
        "Significance",
        snapshot.stat_verdict.to_string(),
        snapshot.p_value,
        snapshot.null_mean
    );
    println!(
        "  {:<14} purity {:.4}   entropy {:.3} bits   {}",
        "Physics",
        snapshot.physics.purity,
        snapshot.physics.entropy,
        if snapshot.physics.is_pure { "pure" } else { "mixed" }
    );
    println!("  {:<14} {final_mark}\n", "Final");
}

fn print_summary(snapshots: &[AuditSnapshot]) {
    println!("{}", "=".repeat(60));
    println!(
        "{:<24} {:<9} {:<15} {:<13} {:>7}",
        "Task", "Final", "Domain", "Stat", "p"
    );
    println!("{}", "-".repeat(60));
    for snapshot in snapshots {
        let domain = match snapshot.domain_verdict {
            DomainVerdict::Valid => "VALID_DOMAIN",
            DomainVerdict::Invalid => "INVALID_DOMAIN",
        };
        let stat = match snapshot.stat_verdict {
            StatVerdict::Valid => "VALID_STAT",
            StatVerdict::Invalid => "INVALID_STAT",
        };
        println!(
            "{:<24} {:<9} {:<15} {:<13} {:>7.2}",
            snapshot.label,
            snapshot.final_verdict.to_string(),
            domain,
            stat,
            snapshot.p_value
        );
    }
}
