//! Colored console output for allocation runs.
//!
//! Installs a `tracing` layer that renders the solver's structured events
//! as one colored line each.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "teamforge_solver=info";

/// Installs the console subscriber.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// directives are honored on top of the `teamforge_solver=info` default.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = match DEFAULT_DIRECTIVE.parse() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(AllocationConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats allocation events with colors.
pub struct AllocationConsoleLayer;

impl<S: Subscriber> Layer<S> for AllocationConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("teamforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let line = format_event(*metadata.level(), &visitor);
        if !line.is_empty() {
            let _ = writeln!(io::stdout().lock(), "{line}");
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    error: Option<String>,
    participants: Option<u64>,
    capacity: Option<u64>,
    team_count: Option<u64>,
    teams: Option<u64>,
    unassigned: Option<u64>,
    placed: Option<u64>,
    balancing_swaps: Option<u64>,
    repair_swaps: Option<u64>,
    duration_ms: Option<u64>,
    limit_ms: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let s = format!("{value:?}").trim_matches('"').to_string();
        self.record_text(field.name(), s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "participants" => &mut self.participants,
            "capacity" => &mut self.capacity,
            "team_count" => &mut self.team_count,
            "teams" => &mut self.teams,
            "unassigned" => &mut self.unassigned,
            "placed" => &mut self.placed,
            "balancing_swaps" => &mut self.balancing_swaps,
            "repair_swaps" => &mut self.repair_swaps,
            "duration_ms" => &mut self.duration_ms,
            "limit_ms" => &mut self.limit_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

impl EventVisitor {
    fn record_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("allocation_start") => format!(
            "{} {} participants ({}), capacity ({}), teams ({})",
            prefix(level),
            "[Allocator]".bright_cyan(),
            count(v.participants).bright_yellow(),
            count(v.capacity).bright_yellow(),
            count(v.team_count).bright_yellow(),
        ),
        Some("phase_end") => format!(
            "{} {} {} placed ({})",
            prefix(level),
            format!("[{}]", v.phase.as_deref().unwrap_or("Unknown")).bright_cyan(),
            "phase ended:".white().bold(),
            count(v.placed).bright_magenta(),
        ),
        Some("allocation_end") => format!(
            "{} {} Allocation ended: time spent ({}), teams ({}), unassigned ({}), swaps ({} balancing, {} repair)",
            prefix(level),
            "[Allocator]".bright_cyan(),
            format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
            count(v.teams).bright_green().bold(),
            count(v.unassigned).white(),
            count(v.balancing_swaps).white(),
            count(v.repair_swaps).white(),
        ),
        Some("timeout") => format!(
            "{} {} Time limit ({}) exceeded",
            prefix(level),
            "[Allocator]".bright_cyan(),
            format_duration_ms(v.limit_ms.unwrap_or(0)).yellow(),
        ),
        Some("phase_failed") => format!(
            "{} {} failed: {}",
            prefix(level),
            format!("[{}]", v.phase.as_deref().unwrap_or("Unknown")).bright_cyan(),
            v.error.as_deref().unwrap_or("unknown error").bright_red(),
        ),
        _ => String::new(),
    }
}

fn prefix(level: Level) -> String {
    let label = match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => " WARN".yellow().to_string(),
        _ => " INFO".bright_green().to_string(),
    };
    format!("{} {label}", timestamp().bright_black())
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{:5}.{:03}", d.as_secs() % 100_000, d.subsec_millis()))
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("placed".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(Level::INFO, &visitor).is_empty());
    }

    #[test]
    fn test_phase_end_line() {
        let visitor = EventVisitor {
            event: Some("phase_end".to_string()),
            phase: Some("balanced_fill".to_string()),
            placed: Some(1200),
            ..EventVisitor::default()
        };
        let line = format_event(Level::INFO, &visitor);
        assert!(line.contains("balanced_fill"));
        assert!(line.contains("1,200"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
