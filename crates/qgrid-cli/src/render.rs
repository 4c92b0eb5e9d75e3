//! Plain-text rendering of a training session

use std::fmt::Write;

use ndarray::Array2;

use qgrid_rl::{Action, GridPos, Reward, TrainingSession, GOAL, GRID_SIZE, START};

use crate::config::DisplayConfig;

/// Full report: heatmap, policy, greedy route and learning curve
pub fn session_report(session: &TrainingSession, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Episodes Trained: {}", session.episodes_run());
    out.push('\n');

    out.push_str("Learned Q-Values (max over actions)\n");
    out.push_str(&heatmap(&session.heatmap_values(), display.precision));
    out.push('\n');

    if display.show_policy {
        out.push_str("Greedy policy\n");
        out.push_str(&policy_map(&session.policy_grid()));
        out.push('\n');
        let _ = writeln!(out, "Greedy route: {}", route(&session.greedy_path()));
        out.push('\n');
    }

    if session.episodes_run() > 0 {
        out.push_str(&learning_progress(
            session.rewards_history(),
            display.moving_average_window,
        ));
    }

    out
}

/// Grid of values with START and GOAL marked
pub fn heatmap(values: &Array2<f64>, precision: usize) -> String {
    let width = 7 + precision;
    let mut out = String::new();

    let _ = write!(out, "{:>5}", "");
    for col in 0..GRID_SIZE {
        let _ = write!(out, "{col:>width$}");
    }
    out.push('\n');

    for row in 0..GRID_SIZE {
        let _ = write!(out, "{row:>5}");
        for col in 0..GRID_SIZE {
            let cell = format!("{:.precision$}{}", values[[row, col]], marker(GridPos::new(row, col)));
            let _ = write!(out, "{cell:>width$}");
        }
        out.push('\n');
    }

    out
}

fn marker(cell: GridPos) -> &'static str {
    if cell == START {
        "S"
    } else if cell == GOAL {
        "G"
    } else {
        " "
    }
}

/// Arrow per cell; the goal is drawn as `G`
pub fn policy_map(policy: &[Vec<Option<Action>>]) -> String {
    policy
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|a| a.map_or('G', Action::symbol).to_string())
                .collect();
            format!("  {}\n", cells.join(" "))
        })
        .collect()
}

pub fn route(path: &[GridPos]) -> String {
    let cells: Vec<String> = path.iter().map(ToString::to_string).collect();
    let mut text = cells.join(" -> ");
    if path.last() != Some(&GOAL) {
        text.push_str(" (does not reach goal)");
    }
    text
}

/// Reward summary plus a coarse curve of block averages
pub fn learning_progress(history: &[Reward], window: usize) -> String {
    let mut out = String::from("Learning Progress\n");
    let Some(last) = history.last() else {
        return out;
    };

    let best = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = history.iter().sum::<f64>() / history.len() as f64;
    let _ = writeln!(out, "  episodes: {}  last: {last}  best: {best}  mean: {mean:.2}", history.len());

    if history.len() > window {
        let averages = qgrid_rl::session::moving_average(history, window);
        if let Some(latest) = averages.last() {
            let _ = writeln!(out, "  {window}-episode average: {latest:.2}");
        }
    }

    let _ = writeln!(out, "  curve: {}", sparkline(history, 40));
    out
}

/// Block averages of `values` drawn as bar glyphs, at most `width` wide
pub fn sparkline(values: &[f64], width: usize) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    if values.is_empty() || width == 0 {
        return String::new();
    }

    let chunk = values.len().div_ceil(width);
    let blocks: Vec<f64> = values
        .chunks(chunk)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();

    let lo = blocks.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = blocks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    blocks
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[0]
            } else {
                let idx = ((v - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}
