//! Integration tests for quantaudit-core.
//!
//! These tests exercise the full audit pipeline:
//! training simulation → domain gate → significance gate → snapshot → ledger.

use quantaudit_core::{
    AuditConfig, AuditLedger, DomainVerdict, FinalVerdict, MetaFeatures, SessionConfig,
    SessionWriter, StatVerdict, TaskKind, compose_snapshot_with, run_training_seeded,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn trained_run_audits_valid_for_every_task() {
    for task in TaskKind::all() {
        let logs = run_training_seeded(task, 100 + task.index() as u64);
        let snapshot = compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &logs,
            None,
            &mut StdRng::seed_from_u64(task.index() as u64),
        );
        assert_eq!(
            snapshot.final_verdict,
            FinalVerdict::Valid,
            "task {} should audit VALID after a full run",
            task.label()
        );
        assert_eq!(snapshot.task_idx, task.index());
        assert!(snapshot.final_acc > 0.9);
        assert_eq!(snapshot.p_value, 0.0);
    }
}

#[test]
fn pipeline_is_deterministic_under_fixed_seeds() {
    let task = TaskKind::ClusterVsNonCluster;
    let run = |train_seed: u64, audit_seed: u64| {
        let logs = run_training_seeded(task, train_seed);
        compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &logs,
            None,
            &mut StdRng::seed_from_u64(audit_seed),
        )
    };

    let a = run(7, 8);
    let b = run(7, 8);
    assert_eq!(a.final_acc, b.final_acc);
    assert_eq!(a.p_value, b.p_value);
    assert_eq!(a.null_distribution, b.null_distribution);

    let c = run(9, 8);
    assert_ne!(
        a.final_acc, c.final_acc,
        "different training seeds should move the observed accuracy"
    );
}

#[test]
fn adversarial_upload_never_reaches_valid() {
    let stuffed = MetaFeatures {
        ndim: 2,
        size: 64,
        max_val: 9000.0,
        is_complex: true,
        norm: 1.0,
        entropy: 6.2,
        semantic_score: 1.0,
        variance: 800.0,
    };

    let task = TaskKind::GhzVsNonGhz;
    let logs = run_training_seeded(task, 1);
    let snapshot = compose_snapshot_with(
        &AuditConfig::default(),
        task,
        &logs,
        Some(&stuffed),
        &mut StdRng::seed_from_u64(1),
    );

    assert_eq!(snapshot.domain_verdict, DomainVerdict::Invalid);
    assert_eq!(
        snapshot.stat_verdict,
        StatVerdict::Valid,
        "the stat gate alone is fooled by a good training curve"
    );
    assert_eq!(snapshot.final_verdict, FinalVerdict::Invalid);
    assert!(!snapshot.domain_reasons.is_empty());
}

#[test]
fn ledger_tracks_one_snapshot_per_task() {
    let mut ledger = AuditLedger::new();

    for round in 0..3u64 {
        for task in TaskKind::all() {
            let logs = run_training_seeded(task, round * 10 + task.index() as u64);
            let snapshot = compose_snapshot_with(
                &AuditConfig::default(),
                task,
                &logs,
                None,
                &mut StdRng::seed_from_u64(round),
            );
            ledger.record(snapshot);
        }
    }

    assert_eq!(ledger.len(), 5, "re-audits must evict, not accumulate");
    for task in TaskKind::all() {
        assert!(ledger.latest(task).is_some());
    }
}

#[test]
fn recorded_session_is_a_complete_audit_trail() {
    let tmp = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        output_dir: tmp.path().to_path_buf(),
        seed: Some(42),
        ..SessionConfig::default()
    };

    let task = TaskKind::Dicke2VsNonDicke2;
    let logs = run_training_seeded(task, 42);
    let mut writer = SessionWriter::new(&config, task).unwrap();
    for entry in &logs {
        writer.write_epoch(entry).unwrap();
    }
    let snapshot = compose_snapshot_with(
        &AuditConfig::default(),
        task,
        &logs,
        None,
        &mut StdRng::seed_from_u64(42),
    );
    let dir = writer.finish(Some(&snapshot)).unwrap();

    assert!(dir.join("session.json").exists(), "session.json missing");
    assert!(dir.join("training.csv").exists(), "training.csv missing");
    assert!(dir.join("snapshot.json").exists(), "snapshot.json missing");

    let meta: quantaudit_core::SessionMeta =
        serde_json::from_str(&std::fs::read_to_string(dir.join("session.json")).unwrap()).unwrap();
    assert_eq!(meta.version, 1);
    assert_eq!(meta.task_idx, task.index());
    assert_eq!(meta.epochs, 20);

    // The recorded digest matches the snapshot file on disk.
    let snapshot_bytes = std::fs::read(dir.join("snapshot.json")).unwrap();
    assert_eq!(
        meta.snapshot_digest.as_deref(),
        Some(quantaudit_core::sha256_hex(&snapshot_bytes).as_str())
    );
}
