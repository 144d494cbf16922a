//! HTTP audit server — JSON API over the audit pipeline.
//!
//! Serves task metadata, basis-state physics, simulated training curves, and
//! full audit snapshots over HTTP, so dashboard frontends and collaborator
//! scripts can drive audits without linking the core crate.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use quantaudit_core::{
    AuditConfig, AuditLedger, AuditSnapshot, MetaFeatures, TaskKind, TrainingConfig,
    basis_vector_with, compose_snapshot_with, physics_baseline, random_seed, run_training,
};

/// Shared server state.
struct AppState {
    ledger: Mutex<AuditLedger>,
}

#[derive(Deserialize)]
struct BasisParams {
    task: Option<usize>,
    /// If true, include the full 64-amplitude vector in the response.
    amplitudes: Option<bool>,
}

#[derive(Deserialize)]
struct TrainingParams {
    task: Option<usize>,
    epochs: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct SnapshotParams {
    task: Option<usize>,
}

#[derive(Deserialize)]
struct AuditRequest {
    task: usize,
    epochs: Option<usize>,
    seed: Option<u64>,
    /// Dataset metadata for the domain gate; the ideal sample when omitted.
    meta: Option<MetaFeatures>,
}

#[derive(Serialize)]
struct AuditResponse {
    success: bool,
    /// Seed the run actually used (echoed back so the audit can be replayed).
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<AuditSnapshot>,
    /// Error message if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    tasks_total: usize,
    audits_recorded: usize,
    audits_valid: usize,
}

#[derive(Serialize)]
struct TasksResponse {
    tasks: Vec<TaskEntry>,
    total: usize,
}

#[derive(Serialize)]
struct TaskEntry {
    index: usize,
    label: String,
    short_name: String,
    family: String,
    description: String,
}

#[derive(Serialize)]
struct SnapshotsResponse {
    snapshots: Vec<AuditSnapshot>,
    total: usize,
    valid: usize,
}

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

/// Resolve a `?task=` query value, with a routing hint in the error.
fn resolve_task(idx: Option<usize>) -> Result<TaskKind, String> {
    match idx {
        Some(i) => TaskKind::from_index(i)
            .ok_or_else(|| format!("Unknown task index: {i}. See /api/tasks for the valid range.")),
        None => Err("Missing required parameter: task".to_string()),
    }
}

fn error_body(message: String) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": false, "error": message }))
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "QuantAudit Server",
        "version": quantaudit_core::VERSION,
        "tasks": TaskKind::all().len(),
        "endpoints": {
            "/": "This API index",
            "/health": "Health check with ledger counters",
            "/api/tasks": "List the five classification tasks",
            "/api/basis": {
                "method": "GET",
                "description": "Basis state and physics baseline for a task",
                "params": {
                    "task": "Task index (0-4, required)",
                    "amplitudes": "Include the 64-amplitude vector (default: false)",
                }
            },
            "/api/training": {
                "method": "GET",
                "description": "Simulated training curve, epoch by epoch",
                "params": {
                    "task": "Task index (0-4, required)",
                    "epochs": "Number of epochs (1-200, default: 20)",
                    "seed": "RNG seed (default: fresh OS entropy)",
                }
            },
            "/api/audit": {
                "method": "POST",
                "description": "Run a full audit and record the snapshot",
                "body": {
                    "task": "Task index (0-4, required)",
                    "epochs": "Number of epochs (1-200, default: 20)",
                    "seed": "RNG seed (default: fresh OS entropy)",
                    "meta": "Dataset metadata for the domain gate (default: ideal sample)",
                }
            },
            "/api/snapshots": "All live audit snapshots",
            "/api/snapshot": "Latest snapshot for ?task=N (404 when absent)",
        },
        "examples": {
            "basis": "/api/basis?task=0&amplitudes=true",
            "training": "/api/training?task=4&epochs=20&seed=42",
            "latest_snapshot": "/api/snapshot?task=0",
        }
    }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ledger = state.ledger.lock().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        tasks_total: TaskKind::all().len(),
        audits_recorded: ledger.len(),
        audits_valid: ledger.valid_count(),
    })
}

async fn handle_tasks() -> Json<TasksResponse> {
    let tasks: Vec<TaskEntry> = TaskKind::all()
        .iter()
        .map(|t| TaskEntry {
            index: t.index(),
            label: t.label().to_string(),
            short_name: t.short_name().to_string(),
            family: t.family().name().to_string(),
            description: t.description().to_string(),
        })
        .collect();
    let total = tasks.len();
    Json(TasksResponse { tasks, total })
}

async fn handle_basis(
    Query(params): Query<BasisParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let task = match resolve_task(params.task) {
        Ok(task) => task,
        Err(msg) => return error_body(msg).with_status(StatusCode::BAD_REQUEST),
    };
    let v = basis_vector_with(task.family(), &mut rand::rng());
    let physics = physics_baseline(&v);
    let support = v.iter().filter(|x| **x != 0.0).count();

    let mut body = serde_json::json!({
        "task": task.index(),
        "label": task.label(),
        "family": task.family().name(),
        "support": support,
        "physics": physics,
    });
    if params.amplitudes.unwrap_or(false) {
        body["amplitudes"] = serde_json::json!(v);
    }
    (StatusCode::OK, Json(body))
}

async fn handle_training(
    Query(params): Query<TrainingParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let task = match resolve_task(params.task) {
        Ok(task) => task,
        Err(msg) => return error_body(msg).with_status(StatusCode::BAD_REQUEST),
    };
    let epochs = params.epochs.unwrap_or(20).clamp(1, 200);
    let seed = params.seed.unwrap_or_else(random_seed);

    let config = TrainingConfig {
        epochs,
        ..TrainingConfig::default()
    };
    let logs = run_training(task, &config, &mut StdRng::seed_from_u64(seed));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "task": task.index(),
            "label": task.label(),
            "seed": seed,
            "epochs": logs.len(),
            "logs": logs,
        })),
    )
}

async fn handle_snapshots(State(state): State<Arc<AppState>>) -> Json<SnapshotsResponse> {
    let ledger = state.ledger.lock().await;
    let snapshots = ledger.snapshots().to_vec();
    let total = snapshots.len();
    let valid = ledger.valid_count();
    Json(SnapshotsResponse {
        snapshots,
        total,
        valid,
    })
}

async fn handle_snapshot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SnapshotParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let task = match resolve_task(params.task) {
        Ok(task) => task,
        Err(msg) => return error_body(msg).with_status(StatusCode::BAD_REQUEST),
    };
    let ledger = state.ledger.lock().await;
    match ledger.latest(task) {
        Some(snapshot) => (StatusCode::OK, Json(serde_json::json!(snapshot))),
        None => error_body(format!(
            "No audit recorded for task {}. POST /api/audit to run one.",
            task.index()
        ))
        .with_status(StatusCode::NOT_FOUND),
    }
}

async fn handle_audit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuditRequest>,
) -> (StatusCode, Json<AuditResponse>) {
    let task = match TaskKind::from_index(request.task) {
        Some(task) => task,
        None => {
            return Json(AuditResponse {
                success: false,
                seed: 0,
                snapshot: None,
                error: Some(format!(
                    "Unknown task index: {}. See /api/tasks for the valid range.",
                    request.task
                )),
            })
            .with_status(StatusCode::BAD_REQUEST);
        }
    };
    let epochs = request.epochs.unwrap_or(20).clamp(1, 200);
    let seed = request.seed.unwrap_or_else(random_seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let config = TrainingConfig {
        epochs,
        ..TrainingConfig::default()
    };
    let logs = run_training(task, &config, &mut rng);
    let snapshot = compose_snapshot_with(
        &AuditConfig::default(),
        task,
        &logs,
        request.meta.as_ref(),
        &mut rng,
    );

    let mut ledger = state.ledger.lock().await;
    ledger.record(snapshot.clone());
    drop(ledger);

    (
        StatusCode::OK,
        Json(AuditResponse {
            success: true,
            seed,
            snapshot: Some(snapshot),
            error: None,
        }),
    )
}

/// Build the axum router.
fn build_router(ledger: AuditLedger) -> Router {
    let state = Arc::new(AppState {
        ledger: Mutex::new(ledger),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/tasks", get(handle_tasks))
        .route("/api/basis", get(handle_basis))
        .route("/api/training", get(handle_training))
        .route("/api/snapshots", get(handle_snapshots))
        .route("/api/snapshot", get(handle_snapshot))
        .route("/api/audit", post(handle_audit))
        .with_state(state)
}

/// Run the HTTP audit server.
pub async fn run_server(ledger: AuditLedger, host: &str, port: u16) {
    let app = build_router(ledger);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> Arc<AppState> {
        Arc::new(AppState {
            ledger: Mutex::new(AuditLedger::new()),
        })
    }

    #[tokio::test]
    async fn test_tasks_lists_all_five() {
        let Json(response) = handle_tasks().await;
        assert_eq!(response.total, 5);
        assert_eq!(response.tasks[0].label, "GHZ vs non-GHZ");
        assert_eq!(response.tasks[4].short_name, "random");
    }

    #[tokio::test]
    async fn test_basis_rejects_bad_task() {
        let (status, Json(body)) = handle_basis(Query(BasisParams {
            task: Some(9),
            amplitudes: None,
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unknown task"));
    }

    #[tokio::test]
    async fn test_basis_includes_amplitudes_on_request() {
        let (status, Json(body)) = handle_basis(Query(BasisParams {
            task: Some(0),
            amplitudes: Some(true),
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["support"], 2);
        assert_eq!(body["amplitudes"].as_array().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_training_is_seed_replayable() {
        let params = || TrainingParams {
            task: Some(4),
            epochs: Some(10),
            seed: Some(42),
        };
        let (_, Json(a)) = handle_training(Query(params())).await;
        let (_, Json(b)) = handle_training(Query(params())).await;
        assert_eq!(a["epochs"], 10);
        assert_eq!(a["logs"], b["logs"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_404_before_audit() {
        let state = empty_state();
        let (status, _) = handle_snapshot(
            State(state.clone()),
            Query(SnapshotParams { task: Some(0) }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_audit_records_and_snapshot_returns_it() {
        let state = empty_state();
        let (status, Json(response)) = handle_audit(
            State(state.clone()),
            Json(AuditRequest {
                task: 0,
                epochs: None,
                seed: Some(42),
                meta: None,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.success);
        assert_eq!(response.seed, 42);
        let snapshot = response.snapshot.unwrap();
        assert_eq!(snapshot.task_idx, 0);

        let (status, Json(body)) = handle_snapshot(
            State(state.clone()),
            Query(SnapshotParams { task: Some(0) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["final_verdict"], "VALID");

        let Json(health) = handle_health(State(state)).await;
        assert_eq!(health.audits_recorded, 1);
        assert_eq!(health.audits_valid, 1);
    }

    #[tokio::test]
    async fn test_audit_with_adversarial_meta_is_invalid() {
        let state = empty_state();
        let stuffed = MetaFeatures {
            ndim: 2,
            size: 10,
            max_val: 5000.0,
            is_complex: false,
            norm: 1.0,
            entropy: 4.0,
            semantic_score: 0.9,
            variance: 900.0,
        };
        let (_, Json(response)) = handle_audit(
            State(state),
            Json(AuditRequest {
                task: 0,
                epochs: None,
                seed: Some(42),
                meta: Some(stuffed),
            }),
        )
        .await;
        let snapshot = response.snapshot.unwrap();
        assert_eq!(format!("{}", snapshot.final_verdict), "INVALID");
        assert_eq!(format!("{}", snapshot.stat_verdict), "VALID_STAT");
    }

    #[test]
    fn test_router_builds() {
        let _router = build_router(AuditLedger::new());
    }
}
