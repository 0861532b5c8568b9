//! Styled terminal output for the isvc CLI
//!
//! Operator-facing messages go through here; diagnostics go through `tracing`.
//! Errors go to stderr.

use crate::traits::ServiceStatus;
use owo_colors::OwoColorize;

/// Pastel palette shared by every message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Good,
    Bad,
    Caution,
    Note,
    Heading,
    Muted,
}

impl Tone {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Good => (152, 225, 152),
            Tone::Bad => (255, 160, 160),
            Tone::Caution => (255, 230, 160),
            Tone::Note => (160, 200, 255),
            Tone::Heading => (181, 174, 254),
            Tone::Muted => (160, 160, 160),
        }
    }

    fn paint(self, text: &str) -> String {
        let (r, g, b) = self.rgb();
        text.truecolor(r, g, b).to_string()
    }
}

/// Tone a service status is shown in
fn status_tone(status: &ServiceStatus) -> Tone {
    match status {
        ServiceStatus::Active => Tone::Good,
        ServiceStatus::Error => Tone::Bad,
        ServiceStatus::Pending => Tone::Caution,
        ServiceStatus::Inactive | ServiceStatus::Other(_) => Tone::Muted,
    }
}

fn marked(symbol: &str, tone: Tone, message: &str) -> String {
    format!("{} {}", tone.paint(symbol).bold(), message.bright_white())
}

pub fn success(message: &str) {
    println!("{}", marked("✓", Tone::Good, message));
}

pub fn error(message: &str) {
    eprintln!("{}", marked("✗", Tone::Bad, message));
}

pub fn warning(message: &str) {
    println!("{}", marked("⚠", Tone::Caution, message));
}

pub fn info(message: &str) {
    println!("{}", marked("ℹ", Tone::Note, message));
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    println!("\n{}", Tone::Heading.paint(title).bold());
    println!("{}", Tone::Muted.paint(&"─".repeat(50)));
}

pub fn key_value(key: &str, value: &str) {
    println!(
        "  {} {}",
        Tone::Muted.paint(&format!("{}:", key)),
        value.bright_white()
    );
}

/// Print a service status row, colored by how settled the service is
pub fn status(label: &str, status: &ServiceStatus) {
    println!(
        "  {} {}",
        Tone::Muted.paint(&format!("{}:", label)),
        status_tone(status).paint(status.as_str()).bold()
    );
}

pub fn dimmed(message: &str) {
    println!("{}", Tone::Muted.paint(message));
}

pub fn blank() {
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tones() {
        assert_eq!(status_tone(&ServiceStatus::Active), Tone::Good);
        assert_eq!(status_tone(&ServiceStatus::Error), Tone::Bad);
        assert_eq!(status_tone(&ServiceStatus::Pending), Tone::Caution);
        assert_eq!(
            status_tone(&ServiceStatus::Other("UPGRADING".to_string())),
            Tone::Muted
        );
    }

    #[test]
    fn test_marked_keeps_message_text() {
        let line = marked("✗", Tone::Bad, "Unknown service: backup");
        assert!(line.contains("Unknown service: backup"));
        assert!(line.contains('✗'));
    }
}
