//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message. The `*_with` variants take explicit
//! reader and writer so they can be driven from tests.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::selection::SelectionSet;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PromptError::Cancelled);
    }
    Ok(line.trim().to_string())
}

/// Prompt for confirmation (yes/no) on stdin.
///
/// Returns `Err(PromptError::NotInteractive)` if not in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    confirm_with(&mut io::stdin().lock(), &mut io::stderr(), message, default)
}

/// [`confirm`] over explicit streams.
pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: bool,
) -> Result<bool, PromptError> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        write!(writer, "{message} {hint} ")?;
        writer.flush()?;
        match read_line(reader)?.to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "Please answer y or n.")?,
        }
    }
}

/// Prompt for text input on stdin. Empty input yields `default` if given.
pub fn input(
    message: &str,
    default: Option<&str>,
    interactive: bool,
) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    input_with(&mut io::stdin().lock(), &mut io::stderr(), message, default)
}

/// [`input`] over explicit streams.
pub fn input_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: Option<&str>,
) -> Result<String, PromptError> {
    match default {
        Some(d) => write!(writer, "{message} [{d}]: ")?,
        None => write!(writer, "{message}: ")?,
    }
    writer.flush()?;
    let answer = read_line(reader)?;
    match (answer.is_empty(), default) {
        (true, Some(d)) => Ok(d.to_string()),
        _ => Ok(answer),
    }
}

/// Pick any number of `options` by toggling their numbers; an empty line
/// finishes.
pub fn select_many<T: AsRef<str>>(
    message: &str,
    options: &[T],
    interactive: bool,
) -> Result<SelectionSet, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    select_many_with(&mut io::stdin().lock(), &mut io::stderr(), message, options)
}

/// [`select_many`] over explicit streams.
pub fn select_many_with<R: BufRead, W: Write, T: AsRef<str>>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    options: &[T],
) -> Result<SelectionSet, PromptError> {
    let mut selection = SelectionSet::new();
    loop {
        writeln!(writer, "{message}")?;
        for (idx, option) in options.iter().enumerate() {
            let mark = if selection.contains(option.as_ref()) { "x" } else { " " };
            writeln!(writer, "  [{mark}] {}) {}", idx + 1, option.as_ref())?;
        }
        write!(writer, "Toggle numbers (space separated), empty line to finish: ")?;
        writer.flush()?;

        let line = read_line(reader)?;
        if line.is_empty() {
            return Ok(selection);
        }
        for token in line.split_whitespace() {
            match token.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => {
                    selection.toggle(options[n - 1].as_ref());
                }
                _ => writeln!(writer, "Ignoring '{token}'")?,
            }
        }
    }
}
