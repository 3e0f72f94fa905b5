//! Yes/no confirmation prompts
//!
//! Every question defaults to "no": only an explicit `y` (or `yes`) accepts.

use std::io::{self, BufRead, Write};
use tracing::debug;

pub trait Prompter {
    fn confirm(&self, question: &str) -> bool;
}

/// Interactive prompt on the controlling terminal
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        let _ = io::stdout().flush();
        read_answer(&mut io::stdin().lock())
    }
}

/// Always gives the same answer (`--yes` / `--no`, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
    fn confirm(&self, question: &str) -> bool {
        debug!("{} -> {}", question, if self.0 { "yes" } else { "no" });
        self.0
    }
}

/// Read one line and decide; EOF or a read error is a decline
fn read_answer<R: BufRead>(input: &mut R) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => {
            println!();
            false
        }
        Ok(_) => is_yes(&line),
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
}
