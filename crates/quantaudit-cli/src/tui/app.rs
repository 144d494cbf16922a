//! TUI application state and event loop.
//!
//! Design: one task is active at a time. Navigate the list, press enter to
//! select, `t` to run a training pass on the selection. An epoch of the
//! simulation is cheap closed-form arithmetic, so training advances on the
//! UI tick and the whole app stays single-threaded.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::prelude::*;

use quantaudit_core::{
    AuditConfig, AuditLedger, MemoryState, TaskKind, TrainingConfig, TrainingLog,
    compose_snapshot_with, simulate_epoch_with,
};

pub struct App {
    tasks: [TaskKind; 5],
    cursor: usize,
    /// Index of the task the dashboard is focused on.
    active: usize,
    running: bool,
    paused: bool,
    /// Whether a training run is in flight for the active task.
    training: bool,
    /// Epoch logs per task, indexed like `tasks`.
    logs: Vec<Vec<TrainingLog>>,
    ledger: AuditLedger,
    memory: MemoryState,
    rng: StdRng,
    seed: u64,
    config: TrainingConfig,
    refresh_rate: Duration,
    status: String,
}

impl App {
    pub fn new(seed: u64, refresh_secs: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let memory = MemoryState::initial(&mut rng);

        Self {
            tasks: TaskKind::all(),
            cursor: 0,
            active: 0,
            running: true,
            paused: false,
            training: false,
            logs: vec![Vec::new(); 5],
            ledger: AuditLedger::new(),
            memory,
            rng,
            seed,
            config: TrainingConfig::default(),
            refresh_rate: Duration::from_secs_f64(refresh_secs),
            status: format!("seed {seed} — press t to train the selected task"),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            if last_tick.elapsed() >= self.refresh_rate {
                if self.training && !self.paused {
                    self.advance_epoch();
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor < self.tasks.len() - 1 {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                // Switching focus mid-run would splice epochs from two tasks
                // into one curve, so any run in flight stops here.
                if self.active != self.cursor {
                    self.active = self.cursor;
                    self.training = false;
                    self.status = format!("watching {}", self.active_task().label());
                }
            }
            KeyCode::Char('t') => {
                self.logs[self.active].clear();
                self.training = true;
                self.paused = false;
                self.status = format!("training {}", self.active_task().label());
            }
            KeyCode::Char('a') => self.audit_now(),
            KeyCode::Char('r') => {
                self.logs[self.active].clear();
                self.training = false;
                self.status = format!("reset {}", self.active_task().label());
            }
            KeyCode::Char('c') => {
                self.ledger.clear();
                self.status = "ledger cleared".into();
            }
            KeyCode::Char('p') => self.paused = !self.paused,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                let secs = (self.refresh_rate.as_secs_f64() / 2.0).max(0.1);
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                let secs = (self.refresh_rate.as_secs_f64() * 2.0).min(10.0);
                self.refresh_rate = Duration::from_secs_f64(secs);
            }
            _ => {}
        }
    }

    /// Simulate one epoch for the active task; finish the run when the
    /// curve reaches the configured epoch count.
    fn advance_epoch(&mut self) {
        let task = self.tasks[self.active];
        let epoch = self.logs[self.active].len() + 1;
        let entry = simulate_epoch_with(
            &self.config,
            epoch,
            self.logs[self.active].last(),
            task,
            &mut self.rng,
        );
        self.logs[self.active].push(entry);

        if self.logs[self.active].len() >= self.config.epochs {
            self.training = false;
            self.finish_run(task);
        }
    }

    /// Imprint the trained domain into memory and compose the audit.
    fn finish_run(&mut self, task: TaskKind) {
        self.memory.imprint(task, &mut self.rng);
        if let Some(last) = self.logs[self.active].last() {
            // Only the trained slot drifts within a run.
            self.memory.coercivities[task.index()] = last.coercivities[task.index()];
        }
        let snapshot = compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &self.logs[self.active],
            None,
            &mut self.rng,
        );
        self.status = format!(
            "{}: {} (p = {:.4})",
            task.label(),
            snapshot.final_verdict,
            snapshot.p_value
        );
        self.ledger.record(snapshot);
    }

    /// Audit whatever curve currently exists for the active task. An empty
    /// curve still composes; it just fails the significance gate.
    fn audit_now(&mut self) {
        let task = self.tasks[self.active];
        let snapshot = compose_snapshot_with(
            &AuditConfig::default(),
            task,
            &self.logs[self.active],
            None,
            &mut self.rng,
        );
        self.status = format!(
            "audited {} at epoch {}: {}",
            task.label(),
            self.logs[self.active].len(),
            snapshot.final_verdict
        );
        self.ledger.record(snapshot);
    }

    // --- Public accessors for rendering ---

    pub fn tasks(&self) -> &[TaskKind] {
        &self.tasks
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn active(&self) -> usize {
        self.active
    }
    pub fn active_task(&self) -> TaskKind {
        self.tasks[self.active]
    }
    pub fn is_training(&self) -> bool {
        self.training
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn epochs_target(&self) -> usize {
        self.config.epochs
    }
    pub fn status(&self) -> &str {
        &self.status
    }
    pub fn logs_for(&self, idx: usize) -> &[TrainingLog] {
        &self.logs[idx]
    }
    pub fn active_logs(&self) -> &[TrainingLog] {
        &self.logs[self.active]
    }
    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }
    pub fn memory(&self) -> &MemoryState {
        &self.memory
    }

    /// Coercivity to display for a task: live value from the curve while
    /// the task is mid-run, sticky memory value otherwise.
    pub fn display_coercivity(&self, idx: usize) -> f64 {
        if idx == self.active
            && let Some(last) = self.logs[idx].last()
        {
            return last.coercivities[idx];
        }
        self.memory.coercivities[idx]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use quantaudit_core::FinalVerdict;

    fn app() -> App {
        App::new(7, 0.5)
    }

    #[test]
    fn new_app_starts_idle_on_first_task() {
        let a = app();
        assert_eq!(a.cursor(), 0);
        assert_eq!(a.active(), 0);
        assert!(!a.is_training());
        assert!(!a.is_paused());
        assert!(a.active_logs().is_empty());
        assert!(a.ledger().is_empty());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut a = app();
        a.handle_key(KeyCode::Up);
        assert_eq!(a.cursor(), 0);
        for _ in 0..10 {
            a.handle_key(KeyCode::Down);
        }
        assert_eq!(a.cursor(), 4);
    }

    #[test]
    fn selecting_another_task_stops_training() {
        let mut a = app();
        a.handle_key(KeyCode::Char('t'));
        assert!(a.is_training());
        a.handle_key(KeyCode::Down);
        a.handle_key(KeyCode::Enter);
        assert_eq!(a.active(), 1);
        assert!(!a.is_training());
    }

    #[test]
    fn full_run_records_a_valid_audit() {
        let mut a = app();
        a.handle_key(KeyCode::Char('t'));
        for _ in 0..a.epochs_target() {
            a.advance_epoch();
        }
        assert!(!a.is_training());
        assert_eq!(a.active_logs().len(), a.epochs_target());
        let snap = a.ledger().latest(TaskKind::GhzVsNonGhz).unwrap();
        assert_eq!(snap.final_verdict, FinalVerdict::Valid);
    }

    #[test]
    fn audit_on_empty_curve_is_invalid() {
        let mut a = app();
        a.handle_key(KeyCode::Char('a'));
        let snap = a.ledger().latest(TaskKind::GhzVsNonGhz).unwrap();
        assert_eq!(snap.final_verdict, FinalVerdict::Invalid);
    }

    #[test]
    fn training_key_restarts_the_curve() {
        let mut a = app();
        a.handle_key(KeyCode::Char('t'));
        a.advance_epoch();
        a.advance_epoch();
        assert_eq!(a.active_logs().len(), 2);
        a.handle_key(KeyCode::Char('t'));
        assert!(a.active_logs().is_empty());
        assert!(a.is_training());
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut a = app();
        a.handle_key(KeyCode::Char('a'));
        assert_eq!(a.ledger().len(), 1);
        a.handle_key(KeyCode::Char('c'));
        assert!(a.ledger().is_empty());
    }

    #[test]
    fn refresh_rate_clamps_at_both_ends() {
        let mut a = app();
        for _ in 0..10 {
            a.handle_key(KeyCode::Char('+'));
        }
        assert!((a.refresh_rate.as_secs_f64() - 0.1).abs() < 1e-9);
        for _ in 0..20 {
            a.handle_key(KeyCode::Char('-'));
        }
        assert!((a.refresh_rate.as_secs_f64() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn final_epoch_imprints_and_syncs_coercivity() {
        let mut a = app();
        let before = a.memory().coercivities[0];
        a.handle_key(KeyCode::Char('t'));
        for _ in 0..a.epochs_target() {
            a.advance_epoch();
        }
        // The trained slot picks up the in-run drift, nothing else moves.
        assert!(a.memory().coercivities[0] > before);
        assert_eq!(
            a.memory().coercivities[1],
            quantaudit_core::INITIAL_COERCIVITIES[1]
        );
    }
}
