//! Console logging
//!
//! Plain colored output locally; inside GitHub Actions warnings and errors
//! are emitted as workflow commands so they show up as annotations.
//! Once stdout carries the summary itself, everything goes to stderr.

use colored::Colorize;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static STDOUT_RESERVED: AtomicBool = AtomicBool::new(false);

/// Keep log lines off stdout for the rest of the run
pub fn reserve_stdout() {
    STDOUT_RESERVED.store(true, Ordering::Relaxed);
}

fn in_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// Workflow commands go to stdout unless the summary is printed there
fn commands_on_stdout(in_actions: bool, stdout_reserved: bool) -> bool {
    in_actions && !stdout_reserved
}

fn emit_command(command: &str, message: &str) {
    let line = workflow_command(command, message);
    if commands_on_stdout(true, STDOUT_RESERVED.load(Ordering::Relaxed)) {
        println!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}

pub fn info(message: &str) {
    eprintln!("{} {}", "→".blue(), message);
}

pub fn warn(message: &str) {
    if in_github_actions() {
        emit_command("warning", message);
    } else {
        eprintln!("{} {}", "Warning:".yellow().bold(), message);
    }
}

pub fn error(message: &str) {
    if in_github_actions() {
        emit_command("error", message);
    } else {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

fn workflow_command(command: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{}::{}", command, escaped)
}
