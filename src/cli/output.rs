//! Terminal output for every command.
//!
//! Human mode prints indented, coloured lines. `--json` turns every line
//! into a `{"type", "payload"}` object on stdout so scripts can follow along,
//! and `--quiet` drops everything except warnings and errors.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::application::{Notice, NoticeLevel};
use crate::domain::projector::{Badge, StepState, Tone};

/// Output flags shared by all handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Apply the global CLI flags. Call once, before any output.
pub fn configure(config: OutputConfig) {
    *config_cell().write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("header", json!({ "app": "mcdesk", "version": version }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("{} {}", "mcdesk".bold(), version.dimmed());
    println!();
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {:<16} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    if is_json() {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

/// Errors go to stderr in both modes.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

pub fn section(title: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

pub fn note(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {}", message.dimmed());
}

pub fn hint(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Print pre-formatted content such as a table, one indented line at a time.
pub fn lines(content: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("lines", json!({ "content": content }));
        return;
    }
    if suppressed(config) {
        return;
    }
    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON document as-is.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Report a command outcome. Returns whether it succeeded.
pub fn notice(notice: &Notice) -> bool {
    match notice.level {
        NoticeLevel::Success => success(&notice.message),
        NoticeLevel::Error => error(&notice.message),
    }
    notice.is_success()
}

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a spinner. Hidden in JSON and quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = read_config();
    if config.json || config.quiet {
        let pb = ProgressBar::hidden();
        pb.set_message(message.to_string());
        return pb;
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner().tick_strings(BRAILLE_SPINNER);
    let style = match style.clone().template("  {spinner:.cyan} {msg}") {
        Ok(templated) => templated,
        Err(_) => style,
    };
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    let config = read_config();
    if config.json || config.quiet {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "✓".green(), message));
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if is_json() {
        pb.finish_and_clear();
        return;
    }
    pb.finish_with_message(format!("{} {}", "×".red(), message));
}

/// Colour a status badge by tone.
#[must_use]
pub fn badge(badge: Badge) -> String {
    if is_json() {
        return badge.label.to_string();
    }
    match badge.tone {
        Tone::Neutral => format!("{}", badge.label.dimmed()),
        Tone::Info => format!("{}", badge.label.blue()),
        Tone::Warning => format!("{}", badge.label.yellow()),
        Tone::Attention => format!("{}", badge.label.magenta()),
        Tone::Success => format!("{}", badge.label.green()),
        Tone::Danger => format!("{}", badge.label.red()),
    }
}

/// One glyph per workflow step.
#[must_use]
pub fn step_glyph(state: StepState) -> String {
    match state {
        StepState::Completed => format!("{}", "●".green()),
        StepState::Current => format!("{}", "◉".cyan()),
        StepState::Pending => format!("{}", "○".dimmed()),
        StepState::Error => format!("{}", "●".red()),
    }
}

#[must_use]
pub fn positive(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.green())
}

#[must_use]
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

/// Whole-dollar amount with thousands separators, e.g. `$52,000`.
#[must_use]
pub fn money(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// [`money`] for optional amounts, `N/A` when missing.
#[must_use]
pub fn money_or_na(value: Option<Decimal>) -> String {
    value.map_or_else(|| crate::domain::external::NOT_AVAILABLE.to_string(), money)
}

/// Percentage with one decimal, `N/A` when undefined.
#[must_use]
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(
        || crate::domain::external::NOT_AVAILABLE.to_string(),
        |v| format!("{v:.1}%"),
    )
}
