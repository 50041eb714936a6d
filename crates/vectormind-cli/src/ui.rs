//! UI utilities for the CLI

use colored::*;
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use vectormind_core::{Result, ServiceStatus};

const PROMPT: &str = "vectormind>";
const TYPEWRITER_DELAY: Duration = Duration::from_millis(15);

/// Display startup banner
pub fn display_banner(model: &str, collection: &str) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "VectorMind - RAG";
    println!(
        "{}{}{}{}",
        "│  ".blue(),
        title.blue().bold(),
        " ".repeat(banner_width - title.len() - 4),
        "│".blue()
    );
    println!("{}", empty_line.blue());

    let model_line = format!("Model: {}", model);
    let collection_line = format!("Collection: {}", collection);
    let feature_lines = [
        "Ask questions about your own documents",
        "",
        model_line.as_str(),
        collection_line.as_str(),
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let padding = (banner_width - 4).saturating_sub(line.chars().count());
            println!("{}", format!("│  {}{}│", line, " ".repeat(padding)).blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: /upload <file> to index a document, then ask away. 'help' lists commands".dimmed()
    );
    println!();
}

/// Wipe the visible conversation and put the cursor back at the top
pub fn clear_screen(out: &mut impl Write) -> Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}

/// Handle input with history navigation
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Check if stdin is a terminal (interactive) or piped
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // End of piped input
            return Ok("exit".to_string());
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let result = read_line_raw(history);
    disable_raw_mode()?;
    println!();

    let input = result?;
    if !input.is_empty() {
        history.push(input.clone());
    }
    Ok(input)
}

fn redraw(input: &str) -> io::Result<()> {
    print!("\r{} {}\x1b[K", PROMPT.green().bold(), input);
    io::stdout().flush()
}

fn read_line_raw(history: &[String]) -> Result<String> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    redraw(&input)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match key_event.code {
            KeyCode::Enter => return Ok(input),
            KeyCode::Char('c') | KeyCode::Char('d')
                if key_event.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok("exit".to_string());
            }
            KeyCode::Char(c) => {
                input.push(c);
                redraw(&input)?;
            }
            KeyCode::Backspace => {
                input.pop();
                redraw(&input)?;
            }
            KeyCode::Up => {
                if !history.is_empty() {
                    let new_index = match history_index {
                        None => history.len() - 1,
                        Some(idx) if idx > 0 => idx - 1,
                        Some(idx) => idx,
                    };
                    history_index = Some(new_index);
                    input = history[new_index].clone();
                    redraw(&input)?;
                }
            }
            KeyCode::Down => {
                if let Some(idx) = history_index {
                    if idx + 1 < history.len() {
                        history_index = Some(idx + 1);
                        input = history[idx + 1].clone();
                    } else {
                        history_index = None;
                        input.clear();
                    }
                    redraw(&input)?;
                }
            }
            KeyCode::Esc => return Ok(String::new()),
            _ => {}
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask a question about the indexed documents", "<question>".green());
    println!("  {} - Index a PDF or text file", "/upload <path>".green());
    println!("  {} - Clear the conversation", "/clear".green());
    println!("  {} - Show whether Ollama and Qdrant are reachable", "/status".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  /upload contracts/lease.pdf");
    println!("  What is the termination notice period?");
}

/// Print the status line of each service
pub fn print_status(services: &[(&str, ServiceStatus)]) {
    println!("{}", "🔍 Services".bold());
    for (name, status) in services {
        let badge = match status {
            ServiceStatus::Online => format!("🟢 {}", status).green(),
            ServiceStatus::Offline => format!("🔴 {}", status).red(),
        };
        println!("  {}: {}", name, badge);
    }
}

/// Print an answer word by word, then how long it took
pub async fn render_answer(answer: &str, elapsed: Duration) -> Result<()> {
    print!("{} ", "🤖".blue());

    if io::stdout().is_terminal() {
        for word in answer.split_whitespace() {
            print!("{} ", word);
            io::stdout().flush()?;
            tokio::time::sleep(TYPEWRITER_DELAY).await;
        }
        println!();
    } else {
        println!("{}", answer);
    }

    println!("{}", format!("⏱️  {:.2}s", elapsed.as_secs_f64()).dimmed());
    Ok(())
}
