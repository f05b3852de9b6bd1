//! Startup model selection

use colored::Colorize;
use lmagent_application::GatewayError;
use lmagent_domain::{ModelRecord, ToolCallingMode};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// Pick the model for this session.
///
/// `preferred` (from `--model`, `LMS_MODEL` or the config file) wins when it
/// names a listed model. Otherwise a numbered menu is shown; an empty line
/// or end of input picks the first model.
pub fn select_model<'a>(
    models: &'a [ModelRecord],
    preferred: Option<&str>,
    input: &mut impl BufRead,
) -> Result<&'a ModelRecord, GatewayError> {
    let default = models.first().ok_or(GatewayError::NoModels)?;

    if let Some(key) = preferred {
        if let Some(model) = models.iter().find(|m| m.model_key == key) {
            println!("{} {}", "Using model:".cyan().bold(), model.label());
            return Ok(model);
        }
        warn!(model = %key, "Requested model is not available");
        println!(
            "{}",
            format!("Warning: Model '{}' not found, showing selection menu", key).yellow()
        );
    }

    println!("{}", "Available LLM Models:".cyan().bold());
    for (i, model) in models.iter().enumerate() {
        println!("{}. {} ({})", i + 1, model.label(), model.model_key.dimmed());
    }
    println!();
    println!("Press Enter for default ({}) or select a number:", default.label());

    loop {
        print!("Select a model by number (or Enter for default): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                println!("Using default model: {}", default.label());
                return Ok(default);
            }
            Ok(_) => {}
        }

        let line = line.trim();
        if line.is_empty() {
            println!("Using default model: {}", default.label());
            return Ok(default);
        }
        match parse_choice(line, models.len()) {
            Ok(index) => return Ok(&models[index]),
            Err(message) => println!("{}", message),
        }
    }
}

/// Tool calling mode for the chosen model.
///
/// Listings without `trainedForToolUse` get prompt-based tool calls.
pub fn session_mode(model: &ModelRecord) -> ToolCallingMode {
    let mode = model.calling_mode();
    if model.trained_for_tool_use.is_none() {
        warn!(
            model = %model.model_key,
            "Tool-use capability not reported; using prompt-based tool calls"
        );
    }
    info!(model = %model.model_key, mode = mode.as_str(), "Model selected");
    mode
}

/// Turn a 1-based menu answer into an index.
fn parse_choice(input: &str, count: usize) -> Result<usize, String> {
    let number: usize = input
        .parse()
        .map_err(|_| "Please enter a valid number or press Enter for default".to_string())?;
    if (1..=count).contains(&number) {
        Ok(number - 1)
    } else {
        Err(format!("Please enter a number between 1 and {}", count))
    }
}
