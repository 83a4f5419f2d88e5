//! Colorful console output for solver events.
//!
//! Provides a `tracing` layer that formats the solver's structured events.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve/phase start/end)
//! - **DEBUG**: Progress updates (about 1/sec) and new bests
//! - **TRACE**: Individual move decisions

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output at INFO.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    init_with_level(LevelFilter::INFO);
}

/// Initializes console output, showing solver events up to `level`.
///
/// `RUST_LOG` directives still apply on top.
pub fn init_with_level(level: LevelFilter) {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        for target in ["coursetable_solver", "coursetable"] {
            if let Ok(directive) = format!("{target}={level}").parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ConsoleLayer)
            .try_init();
    });
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
                              _        _     _
  ___ ___  _   _ _ __ ___  ___| |_ __ _| |__ | | ___
 / __/ _ \| | | | '__/ __|/ _ \ __/ _` | '_ \| |/ _ \
| (_| (_) | |_| | |  \__ \  __/ || (_| | |_) | |  __/
 \___\___/ \__,_|_|  |___/\___|\__\__,_|_.__/|_|\___|
"#;

    let version_line = format!("            v{VERSION} - Curriculum-Based Course Timetabling\n");

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("coursetable") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{output}");
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    instance: Option<String>,
    acceptor: Option<String>,
    kind: Option<String>,
    lectures: Option<u64>,
    time_limit_ms: Option<u64>,
    duration_ms: Option<u64>,
    steps: Option<u64>,
    speed: Option<u64>,
    score: Option<i64>,
    distance: Option<i64>,
    cost: Option<i64>,
    best: Option<i64>,
    delta: Option<i64>,
    accepted: Option<bool>,
    best_effort: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{value:?}");
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "phase" => self.phase = Some(s),
            "instance" => self.instance = Some(s),
            "acceptor" => self.acceptor = Some(s),
            "kind" => self.kind = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "lectures" => self.lectures = Some(value),
            "time_limit_ms" => self.time_limit_ms = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "steps" => self.steps = Some(value),
            "speed" => self.speed = Some(value),
            _ => self.record_i64(field, value as i64),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "score" => self.score = Some(value),
            "distance" | "pending" => self.distance = Some(value),
            "cost" => self.cost = Some(value),
            "best" => self.best = Some(value),
            "delta" => self.delta = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "accepted" => self.accepted = Some(value),
            "best_effort" => self.best_effort = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "instance" => self.instance = Some(value.to_string()),
            "acceptor" => self.acceptor = Some(value.to_string()),
            "kind" => self.kind = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "progress" => format_progress(v),
        "new_best" => format_new_best(v),
        "step" if level == Level::TRACE => format_step(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    format!(
        "{} {} Solving {} │ {} lectures │ {} limit",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.instance.as_deref().unwrap_or("?").white().bold(),
        v.lectures.unwrap_or(0).bright_yellow(),
        format_duration_ms(v.time_limit_ms.unwrap_or(0)).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let distance = v.distance.unwrap_or(0);
    let status = if v.best_effort.unwrap_or(distance > 0) {
        format!("BEST EFFORT ({distance} pending)").bright_red().bold().to_string()
    } else {
        "FEASIBLE".bright_green().bold().to_string()
    };
    format!(
        "{} {} Solving complete │ {} │ cost {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.cost.unwrap_or(0).bright_magenta().bold(),
        status,
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
    );
    if let Some(acceptor) = &v.acceptor {
        output.push_str(&format!(" │ {}", acceptor.bright_yellow()));
    }
    output
}

fn format_phase_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} ended │ {} │ {} steps │ {} steps/s │ score {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.steps.unwrap_or(0).white(),
        v.speed.unwrap_or(0).bright_magenta().bold(),
        format_score(v.score.unwrap_or(0)),
    )
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "{} {} {:>10} steps │ best {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.steps.unwrap_or(0).white(),
        format_score(v.best.unwrap_or(0)),
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    let score = v.distance.or(v.cost).unwrap_or(0);
    format!(
        "{} {} new best at step {} │ {}",
        format_elapsed(),
        "★".bright_yellow(),
        v.steps.unwrap_or(0),
        format_score(score),
    )
}

fn format_step(v: &EventVisitor) -> String {
    let icon = if v.accepted.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };
    let delta = v
        .delta
        .map(|d| format!("{d:+}"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {} {:<16} │ Δ {}",
        format_elapsed(),
        icon,
        v.kind.as_deref().unwrap_or("").bright_black(),
        delta.bright_black(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{mins}m {secs}s")
    }
}

fn format_score(score: i64) -> String {
    if score == 0 {
        score.bright_green().to_string()
    } else {
        score.yellow().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(350), "350ms");
        assert_eq!(format_duration_ms(2_500), "2.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("validate".to_string()),
            ..EventVisitor::default()
        };

        assert!(format_event(&visitor, Level::INFO).is_empty());
    }

    #[test]
    fn test_steps_only_show_at_trace() {
        let visitor = EventVisitor {
            event: Some("step".to_string()),
            kind: Some("swap_rooms".to_string()),
            accepted: Some(true),
            ..EventVisitor::default()
        };

        assert!(format_event(&visitor, Level::DEBUG).is_empty());
        assert!(format_event(&visitor, Level::TRACE).contains("swap_rooms"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init_with_level(LevelFilter::DEBUG);
        assert!(INIT.get().is_some());
    }
}
