use std::io::{self, Write};

use todo_core::Dialog;

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalDialog;

impl Dialog for TerminalDialog {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation");
                false
            }
        }
    }

    fn alert(&mut self, message: &str) {
        println!("!! {message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
