//! Colored terminal output for the CLI subcommands.
//!
//! Uses `console` for styling. The server itself only logs through
//! `tracing`; nothing here runs on the request path.

use console::Style;

use crate::batch::BatchOutcome;
use crate::lifecycle::EntityType;
use crate::rollback::RollbackOutcome;

/// Terminal printer with one style per outcome kind.
pub struct Report {
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    pub fn heading(&self, text: &str) {
        println!();
        println!("{}", self.yellow.apply_to(format!("─── {text} ───")));
    }

    /// Prints the summary line and one line per item.
    pub fn batch(&self, outcome: &BatchOutcome) {
        let summary = &outcome.summary;
        let mark = if summary.failed == 0 {
            self.green.apply_to("✓")
        } else {
            self.red.apply_to("✗")
        };
        println!(
            "  {mark} {} on {} entities: {} succeeded, {} failed",
            summary.action, summary.total, summary.successful, summary.failed
        );
        println!("    {}", self.dim.apply_to(&outcome.operation_id));

        for item in &outcome.results {
            match &item.error {
                None => println!("    {} #{}", self.green.apply_to("•"), item.id),
                Some(error) => println!("    {} #{}: {error}", self.red.apply_to("•"), item.id),
            }
        }
    }

    pub fn transitions(&self, entity_type: EntityType, from: &str, allowed: &[&str]) {
        if allowed.is_empty() {
            println!(
                "  {entity_type} {} is terminal",
                self.yellow.apply_to(from)
            );
            return;
        }
        println!(
            "  {entity_type} {} → {}",
            self.yellow.apply_to(from),
            self.green.apply_to(allowed.join(", "))
        );
    }

    pub fn rollback(&self, outcome: &RollbackOutcome) {
        match &outcome.failure {
            None => println!(
                "  {} rolled back {} ({} restored)",
                self.green.apply_to("✓"),
                outcome.operation_id,
                outcome.restored
            ),
            Some(failure) => println!(
                "  {} rollback of {} stopped at #{}: {}",
                self.red.apply_to("✗"),
                outcome.operation_id,
                failure.id,
                failure.message
            ),
        }
    }

    /// Prints any serializable value as pretty JSON.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}
