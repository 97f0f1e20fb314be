//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, pulled and pushed entries
//! - Red: errors
//! - Yellow: skipped entries
//! - Cyan: hints

use console::{style, Style};

use crate::core::domain::{Entry, Outcome, SyncReport};

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn paint(style: Style, text: &str) -> String {
    if colors_enabled() {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ pulled 3 secrets`
pub fn success(msg: &str) {
    println!("{} {}", paint(Style::new().green(), "✓"), msg);
}

/// Print an error message to stderr (red).
///
/// Example: `✗ DB_PASSWORD: secret does not exist at secret/db`
pub fn error(msg: &str) {
    let mark = if colors_enabled() {
        style("✗").for_stderr().red().to_string()
    } else {
        "✗".to_string()
    };
    eprintln!("{} {}", mark, msg);
}

/// Print a hint message (cyan).
///
/// Example: `→ create .secret.yml or pass --config`
pub fn hint(msg: &str) {
    println!("{} {}", paint(Style::new().cyan(), "→"), paint(Style::new().cyan(), msg));
}

/// Print one sync line.
///
/// Example: `[EnvVar] Skipped: API_KEY (pull only)`
pub fn entry(entry: &Entry) {
    let style = match entry.outcome {
        Outcome::Pulled | Outcome::Pushed => Style::new().green(),
        Outcome::Skipped(_) => Style::new().yellow(),
    };
    println!("{}", paint(style, &entry.to_string()));
}

/// Print every line of a report followed by a summary.
pub fn report(report: &SyncReport, verb: &str) {
    for e in &report.entries {
        entry(e);
    }

    let completed = report.completed();
    let noun = if completed == 1 { "secret" } else { "secrets" };
    match report.skipped() {
        0 => success(&format!("{} {} {}", verb, completed, noun)),
        skipped => success(&format!(
            "{} {} {}, {} skipped",
            verb, completed, noun, skipped
        )),
    }
}
