//! Terminal styling shared by the CLI views.

use crate::scoring::{ConfidenceSeverity, TriageTier};

/// 24-bit ANSI colors
pub mod colors {
    pub const TITLE: &str = "\x1b[38;2;110;190;250m";
    pub const OK: &str = "\x1b[38;2;110;230;140m";
    pub const ERR: &str = "\x1b[38;2;250;95;95m";
    pub const WARN: &str = "\x1b[38;2;250;190;90m";
    pub const MUTED: &str = "\x1b[38;2;150;150;150m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

pub mod symbols {
    pub const OK: &str = "✓";
    pub const ERR: &str = "✗";
    pub const NOTICE: &str = "!";
    pub const ARROW: &str = "›";
    pub const BAR_FULL: &str = "█";
    pub const BAR_EMPTY: &str = "░";
}

const RULE_WIDTH: usize = 64;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Title line plus rule
pub fn print_header(name: &str, version: &str) {
    println!();
    println!("{}{}{} {}v{}{}", colors::BOLD, name, colors::RESET, colors::MUTED, version, colors::RESET);
    println!("{}{}{}", colors::MUTED, rule(), colors::RESET);
}

pub fn print_footer() {
    println!("{}{}{}", colors::MUTED, rule(), colors::RESET);
    println!();
}

/// `[tag] title`
pub fn print_section(tag: &str, title: &str) {
    println!(
        "{}[{}]{} {}{}{}",
        colors::MUTED,
        tag,
        colors::RESET,
        colors::TITLE,
        title,
        colors::RESET
    );
}

pub fn print_ok(message: &str) {
    println!("  {}{}{} {}", colors::OK, symbols::OK, colors::RESET, message);
}

pub fn print_err(message: &str) {
    println!("  {}{}{} {}", colors::ERR, symbols::ERR, colors::RESET, message);
}

/// Highlighted warning, e.g. the demo-mode banner
pub fn print_notice(message: &str) {
    println!(
        "  {}{} {}{}",
        colors::WARN,
        symbols::NOTICE,
        message,
        colors::RESET
    );
}

pub fn print_kv(key: &str, value: &str, key_width: usize) {
    println!("  {:width$} {}", key, value, width = key_width);
}

/// Key/value line with the value drawn in `color`
pub fn print_kv_colored(key: &str, value: &str, color: &str, key_width: usize) {
    println!(
        "  {:width$} {}{}{}",
        key,
        color,
        value,
        colors::RESET,
        width = key_width
    );
}

/// `[████░░░░]` for a fraction in 0..=1; out-of-range input is clamped
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!(
        "[{}{}]",
        symbols::BAR_FULL.repeat(filled),
        symbols::BAR_EMPTY.repeat(width - filled)
    )
}

/// Health score bar followed by `NN/100`
pub fn score_gauge(score: u8, width: usize) -> String {
    let score = score.min(100);
    format!("{} {:>3}/100", progress_bar(f64::from(score) / 100.0, width), score)
}

pub fn tier_color(tier: TriageTier) -> &'static str {
    match tier {
        TriageTier::Good => colors::OK,
        TriageTier::AttentionNeeded => colors::WARN,
        TriageTier::Emergency => colors::ERR,
    }
}

pub fn severity_color(severity: ConfidenceSeverity) -> &'static str {
    match severity {
        ConfidenceSeverity::Good => colors::OK,
        ConfidenceSeverity::Caution => colors::MUTED,
        ConfidenceSeverity::Warning => colors::WARN,
        ConfidenceSeverity::Critical => colors::ERR,
    }
}

/// Human readable size for upload confirmations
pub fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}
