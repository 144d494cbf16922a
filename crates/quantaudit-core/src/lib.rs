//! # quantaudit-core
//!
//! **Audit the classifier before you believe the dashboard.**
//!
//! `quantaudit-core` is the decision engine behind the quantaudit
//! dashboard: a deterministic pipeline that takes coarse dataset
//! metadata and a completed training curve, and produces a layered
//! audit verdict — domain plausibility, statistical significance
//! against a chance-level null, and a physics baseline over the task's
//! ideal basis state.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quantaudit_core::{AuditLedger, TaskKind, compose_snapshot, run_training_seeded};
//!
//! let task = TaskKind::GhzVsNonGhz;
//! let logs = run_training_seeded(task, 42);
//! let snapshot = compose_snapshot(task, &logs, None);
//! println!("{}: {}", snapshot.label, snapshot.final_verdict);
//!
//! let mut ledger = AuditLedger::new();
//! ledger.record(snapshot);
//! assert_eq!(ledger.len(), 1);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! MetaFeatures ──> classify ──> verify ────┐
//!                                          ├──> compose_snapshot ──> AuditLedger
//! TrainingLog* ──> significance gate ──────┘
//! ```
//!
//! The pipeline is pure and synchronous: no I/O, no hidden state, and
//! no failure for well-typed input. Session recording ([`session`]) is
//! the only module that touches the filesystem, and the ledger is a
//! plain value owned by the caller.

pub mod basis;
pub mod classify;
pub mod interpret;
pub mod ledger;
pub mod memory;
pub mod meta;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod task;
pub mod training;
pub mod verify;

pub use basis::{DIM, PhysicsBaseline, StateFamily, basis_vector, basis_vector_with, physics_baseline};
pub use classify::{
    ClassifierConfig, Domain, DomainPrediction, classify_domain, classify_domain_with,
    score_candidates,
};
pub use interpret::{
    AblationResult, FEATURE_COUNT, FeatureImportance, NegativeControlEpoch, NegativeControlResult,
    ablation_study, domain_attribution, feature_importance,
};
pub use ledger::AuditLedger;
pub use memory::{
    DOMAIN_SLICES, DomainSlice, INITIAL_COERCIVITIES, MEMORY_COLS, MEMORY_ROWS, MemoryState,
};
pub use meta::MetaFeatures;
pub use session::{
    MachineInfo, SESSION_FORMAT_VERSION, SessionConfig, SessionMeta, SessionWriter,
    detect_machine_info, format_iso8601, format_iso8601_compact, sha256_hex,
};
pub use snapshot::{
    AuditConfig, AuditSnapshot, BASELINE_ACC, FinalVerdict, compose_snapshot,
    compose_snapshot_with,
};
pub use stats::{
    SignificanceConfig, SignificanceReport, StatVerdict, significance_gate, significance_gate_with,
};
pub use task::TaskKind;
pub use training::{
    Confusion, TrainingConfig, TrainingLog, precision_recall_f1, random_seed, run_training,
    run_training_seeded, simulate_epoch, simulate_epoch_with,
};
pub use verify::{CONFIDENCE_THRESHOLD, DomainAudit, DomainVerdict, verify_batch};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
