//! TUI rendering — task-focused dashboard layout.
//!
//! ┌──────────────────────────────────────────────────┐
//! │  🔬 QuantAudit   GHZ vs non-GHZ   epoch 12/20    │
//! ├────────────────────┬─────────────────────────────┤
//! │  Tasks             │  ╭ accuracy ~~~~ 0.94       │
//! │  ▸ GHZ vs non-GHZ ●│  │ loss     ~~   0.12       │
//! │    W vs non-W      │  ╰────────────────────────  │
//! │    Dicke2 vs ...   ├─────────────────────────────┤
//! │    Cluster vs ...  │  VALID                      │
//! │    Random vs ...   │  Domain: VALID_DOMAIN       │
//! │                    │  Stats:  p = 0.0002         │
//! ├────────────────────┴─────────────────────────────┤
//! │  ghz     ██████ 0.31   ░░▒▒░░░░░░░░░░▒▒          │
//! ├──────────────────────────────────────────────────┤
//! │  ↑↓ navigate   enter: select   t: train   q: quit│
//! └──────────────────────────────────────────────────┘

use super::app::App;
use quantaudit_core::{DOMAIN_SLICES, FinalVerdict, MemoryState, TaskKind};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(7), // memory
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_memory(f, rows[2], app);
    draw_keys(f, rows[3], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let epoch = app.active_logs().len();
    let target = app.epochs_target();
    let seed = app.seed();
    let spin = if app.is_training() {
        " ⟳"
    } else if app.is_paused() {
        " ⏸"
    } else {
        ""
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 🔬 QuantAudit ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("  watching: "),
            Span::styled(
                app.active_task().label(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  epoch {epoch}/{target}  seed {seed}{spin} "),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_task_list(f, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(cols[1]);

    draw_chart(f, right[0], app);
    draw_verdict(f, right[1], app);
}

fn draw_task_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<Row> = app
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_cursor = i == app.cursor();
            let is_active = i == app.active();

            let pointer = if is_cursor { "▸" } else { " " };
            let marker = if is_active { "●" } else { " " };

            let verdict = app.ledger().latest(*task);
            let verdict_str = match verdict {
                Some(s) if s.final_verdict == FinalVerdict::Valid => "✓ VALID",
                Some(_) => "✗ INVALID",
                None => "—",
            };
            let acc_str = match app.logs_for(i).last() {
                Some(log) => format!("{:.3}", log.acc),
                None => "—".into(),
            };

            let style = if is_cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if is_active {
                Style::default().fg(Color::Yellow).bold()
            } else {
                match verdict {
                    Some(s) if s.final_verdict == FinalVerdict::Valid => {
                        Style::default().fg(Color::Green)
                    }
                    Some(_) => Style::default().fg(Color::Red),
                    None => Style::default().fg(Color::White),
                }
            };

            Row::new(vec![
                pointer.to_string(),
                marker.to_string(),
                task.label().to_string(),
                task.short_name().to_string(),
                verdict_str.to_string(),
                acc_str,
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        items,
        [
            Constraint::Length(2),  // pointer
            Constraint::Length(2),  // active marker
            Constraint::Length(22), // label
            Constraint::Length(7),  // short name
            Constraint::Length(10), // verdict
            Constraint::Length(6),  // accuracy
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tasks (enter to select) "),
    );

    f.render_widget(table, area);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let logs = app.active_logs();
    let label = app.active_task().label();

    if logs.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {label} — no epochs yet "));
        let p = Paragraph::new("Press t to start a training run")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let acc_data: Vec<(f64, f64)> = logs.iter().map(|l| (l.epoch as f64, l.acc)).collect();
    let loss_data: Vec<(f64, f64)> = logs.iter().map(|l| (l.epoch as f64, l.loss)).collect();
    let latest = logs.last().map(|l| l.acc).unwrap_or(0.0);

    let datasets = vec![
        Dataset::default()
            .name(format!("acc {latest:.3}"))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Cyan))
            .data(&acc_data),
        Dataset::default()
            .name("loss")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .data(&loss_data),
    ];

    let x_max = (app.epochs_target().max(logs.len())) as f64;

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {label}  acc={latest:.3} ")),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(vec![
            Line::from("0"),
            Line::from(format!("{x_max:.0}")),
        ]))
        .y_axis(Axis::default().bounds([0.0, 1.0]).labels(vec![
            Line::from("0.0"),
            Line::from("1.0"),
        ]));

    f.render_widget(chart, area);
}

fn draw_verdict(f: &mut Frame, area: Rect, app: &App) {
    let task = app.active_task();

    let lines = match app.ledger().latest(task) {
        Some(snap) => {
            let verdict_style = if snap.final_verdict == FinalVerdict::Valid {
                Style::default().bold().fg(Color::Green)
            } else {
                Style::default().bold().fg(Color::Red)
            };

            let mut lines = vec![
                Line::from(Span::styled(snap.final_verdict.to_string(), verdict_style)),
                Line::from(""),
                Line::from(format!(
                    "Domain: {}  ({} @ {:.0}%)",
                    snap.domain_verdict,
                    snap.predicted_domain,
                    snap.domain_confidence * 100.0
                )),
            ];
            for reason in &snap.domain_reasons {
                lines.push(Line::from(Span::styled(
                    format!("  ✗ {reason}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from(format!(
                "Stats:  {}  p = {:.4} (null {:.3} ± {:.3})",
                snap.stat_verdict, snap.p_value, snap.null_mean, snap.null_std
            )));
            lines.push(Line::from(format!(
                "Acc:    {:.3} vs baseline {:.3}",
                snap.final_acc, snap.baseline_acc
            )));
            lines.push(Line::from(format!(
                "State:  purity {:.3}  entropy {:.2} bits  {}",
                snap.physics.purity,
                snap.physics.entropy,
                if snap.physics.is_pure { "pure" } else { "mixed" }
            )));
            lines.push(Line::from(Span::styled(
                snap.timestamp.clone(),
                Style::default().fg(Color::DarkGray),
            )));
            lines
        }
        None => vec![
            Line::from(Span::styled(
                "No audit yet",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from("A finished training run audits itself;"),
            Line::from("press a to audit the current curve now."),
        ],
    };

    let block = Block::default().borders(Borders::ALL).title(" Audit ");
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

fn draw_memory(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let c = app.display_coercivity(i);
            let bar_len = ((c * 40.0) as usize).min(16);
            let strip: String = slice_heat(app.memory(), *task)
                .iter()
                .map(|&v| shade(v))
                .collect();

            let style = if i == app.active() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(format!(" {:<8}", task.short_name()), style),
                Span::styled(
                    format!("{:<16}", "█".repeat(bar_len)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" {c:.2}  ")),
                Span::styled(strip, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Memory (coercivity / domain slice) ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let bar = Paragraph::new(format!(
        " ↑↓ navigate   enter: select   t: train   a: audit   p: pause   r: reset   c: clear   +/-: speed   q: quit  │ {}",
        app.status()
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

/// Mean absolute cell value of a task's slice, folded into 16 buckets.
fn slice_heat(memory: &MemoryState, task: TaskKind) -> [f64; 16] {
    let slice = DOMAIN_SLICES[task.index()];
    let width = (slice.end - slice.start) / 16;
    let rows = memory.matrix.len() as f64;
    let mut heat = [0.0; 16];
    for (b, h) in heat.iter_mut().enumerate() {
        let start = slice.start + b * width;
        let mut sum = 0.0;
        for row in &memory.matrix {
            for v in &row[start..start + width] {
                sum += v.abs();
            }
        }
        *h = sum / (rows * width as f64);
    }
    heat
}

fn shade(v: f64) -> char {
    match v {
        v if v < 0.03 => ' ',
        v if v < 0.05 => '░',
        v if v < 0.08 => '▒',
        v if v < 0.12 => '▓',
        _ => '█',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shade_is_monotone() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(0.04), '░');
        assert_eq!(shade(0.06), '▒');
        assert_eq!(shade(0.10), '▓');
        assert_eq!(shade(0.50), '█');
    }

    #[test]
    fn imprint_raises_slice_heat() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut memory = MemoryState::initial(&mut rng);
        let before: f64 = slice_heat(&memory, TaskKind::RandomVsNonRandom)
            .iter()
            .sum();
        let ghz_before = slice_heat(&memory, TaskKind::GhzVsNonGhz);
        memory.imprint(TaskKind::RandomVsNonRandom, &mut rng);
        let after: f64 = slice_heat(&memory, TaskKind::RandomVsNonRandom)
            .iter()
            .sum();
        assert!(after > before);
        // Imprinting never leaks outside the task's own slice.
        assert_eq!(slice_heat(&memory, TaskKind::GhzVsNonGhz), ghz_before);
    }
}
