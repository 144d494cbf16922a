//! Audit ledger — the owned container for snapshot history.
//!
//! At most one live snapshot per task: recording evicts any previous
//! snapshot for the same task, and survivors keep their insertion
//! order with the newest record at the end. The ledger is a plain
//! value; callers own it, nothing in the crate holds one globally.

use serde::{Deserialize, Serialize};

use crate::snapshot::{AuditSnapshot, FinalVerdict};
use crate::task::TaskKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLedger {
    snapshots: Vec<AuditSnapshot>,
}

impl AuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot, evicting any previous one for the same task.
    pub fn record(&mut self, snapshot: AuditSnapshot) {
        self.snapshots.retain(|s| s.task_idx != snapshot.task_idx);
        log::debug!(
            "ledger: task {} recorded ({})",
            snapshot.task_idx,
            snapshot.final_verdict
        );
        self.snapshots.push(snapshot);
    }

    /// Live snapshot for a task, if one was recorded.
    pub fn latest(&self, task: TaskKind) -> Option<&AuditSnapshot> {
        self.snapshots.iter().find(|s| s.task_idx == task.index())
    }

    /// All live snapshots in insertion order.
    pub fn snapshots(&self) -> &[AuditSnapshot] {
        &self.snapshots
    }

    /// Snapshots whose final verdict is VALID.
    pub fn valid_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.final_verdict == FinalVerdict::Valid)
            .count()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{AuditConfig, compose_snapshot_with};
    use crate::training::run_training_seeded;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snapshot_for(task: TaskKind, seed: u64) -> AuditSnapshot {
        let logs = run_training_seeded(task, seed);
        compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &logs,
            None,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_record_and_lookup() {
        let mut ledger = AuditLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.latest(TaskKind::GhzVsNonGhz).is_none());

        ledger.record(snapshot_for(TaskKind::GhzVsNonGhz, 1));
        ledger.record(snapshot_for(TaskKind::WVsNonW, 2));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.latest(TaskKind::GhzVsNonGhz).is_some());
        assert!(ledger.latest(TaskKind::Dicke2VsNonDicke2).is_none());
    }

    #[test]
    fn test_rerecording_evicts_and_moves_to_the_end() {
        let mut ledger = AuditLedger::new();
        ledger.record(snapshot_for(TaskKind::GhzVsNonGhz, 1));
        ledger.record(snapshot_for(TaskKind::WVsNonW, 2));

        let replacement = snapshot_for(TaskKind::GhzVsNonGhz, 3);
        let replacement_p = replacement.p_value;
        ledger.record(replacement);

        assert_eq!(ledger.len(), 2);
        // Survivor order: W first, then the fresh GHZ record.
        assert_eq!(ledger.snapshots()[0].task_idx, 1);
        assert_eq!(ledger.snapshots()[1].task_idx, 0);
        let latest = ledger.latest(TaskKind::GhzVsNonGhz).unwrap();
        assert_eq!(latest.p_value, replacement_p);
    }

    #[test]
    fn test_valid_count_and_clear() {
        let mut ledger = AuditLedger::new();
        for task in TaskKind::all() {
            ledger.record(snapshot_for(task, 10 + task.index() as u64));
        }
        assert_eq!(ledger.len(), 5);
        // Fully trained runs with no dataset pass both gates.
        assert_eq!(ledger.valid_count(), 5);

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.valid_count(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut ledger = AuditLedger::new();
        ledger.record(snapshot_for(TaskKind::ClusterVsNonCluster, 4));
        let json = serde_json::to_string(&ledger).unwrap();
        let back: AuditLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.snapshots()[0].task_idx, 3);
    }
}
