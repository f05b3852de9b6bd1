//! REPL (Read-Eval-Print Loop) for the agent shell

use super::interrupt::Interrupt;
use crate::output::console::{ConsoleFormatter, SessionInfo};
use lmagent_application::{RunTurnError, RunTurnUseCase, TurnOutcome};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use tracing::{debug, warn};

const PROMPT: &str = "You: ";

/// Interactive agent REPL
pub struct AgentRepl {
    use_case: RunTurnUseCase,
    interrupt: Interrupt,
    history_path: Option<PathBuf>,
}

impl AgentRepl {
    /// `interrupt` ends the session while a turn is running
    pub fn new(use_case: RunTurnUseCase, interrupt: Interrupt) -> Self {
        Self {
            use_case,
            interrupt,
            history_path: dirs::data_dir().map(|p| p.join("lmagent").join("history.txt")),
        }
    }

    /// Run the interactive REPL until the user leaves
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if is_exit_command(line) {
                        println!("Goodbye!");
                        break;
                    }

                    let _ = rl.add_history_entry(line);

                    // Outside readline the terminal sends Ctrl+C as SIGINT
                    let Some(result) = self.interrupt.guard(self.use_case.process(line)).await
                    else {
                        self.use_case.interrupted(line);
                        println!();
                        println!("Goodbye!");
                        break;
                    };
                    println!("{}", render_outcome(&result));
                    println!();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!();
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "Readline failed");
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(e) = rl.save_history(path)
        {
            debug!(error = %e, "Could not save history");
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let tools = self.use_case.tool_names();
        let memory = self.use_case.memory().stats();
        let info = SessionInfo {
            model: self.use_case.model(),
            mode: self.use_case.mode(),
            tools: &tools,
            dev_mode: self.use_case.dev_mode(),
            memory: &memory,
        };
        println!();
        println!("{}", ConsoleFormatter::banner(&info));
    }
}

/// `quit`, `exit` and `bye` end the session, in any case
fn is_exit_command(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "quit" | "exit" | "bye")
}

fn render_outcome(result: &Result<TurnOutcome, RunTurnError>) -> String {
    match result {
        Ok(TurnOutcome::Responded(text)) => ConsoleFormatter::response(text),
        Ok(TurnOutcome::Cancelled) => ConsoleFormatter::cancelled(),
        Ok(TurnOutcome::Dev(report)) => ConsoleFormatter::dev_report(report),
        Err(e) => ConsoleFormatter::error(&e.to_string()),
    }
}
