//! Interactive GitHub credential entry

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use git_travis_ci_monitor::{CiError, CredentialPrompt};
use std::io::{self, BufRead, IsTerminal, Write};

/// Reads the username from stdin and the password without echo
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn prompt(&self) -> Result<(String, String), CiError> {
        let username = read_line("GitHub username: ")?;
        let password = if io::stdin().is_terminal() {
            read_hidden("GitHub password: ")?
        } else {
            read_line("GitHub password: ")?
        };
        Ok((username, password))
    }
}

fn read_line(label: &str) -> Result<String, CiError> {
    eprint!("{label}");
    io::stderr().flush().map_err(prompt_error)?;

    let mut buf = String::new();
    let read = io::stdin().lock().read_line(&mut buf).map_err(prompt_error)?;
    if read == 0 {
        return Err(CiError::auth("no credentials entered"));
    }
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

fn read_hidden(label: &str) -> Result<String, CiError> {
    eprint!("{label}");
    io::stderr().flush().map_err(prompt_error)?;

    terminal::enable_raw_mode().map_err(prompt_error)?;
    let result = collect_hidden();
    let _ = terminal::disable_raw_mode();
    eprintln!();
    result
}

fn collect_hidden() -> Result<String, CiError> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read().map_err(prompt_error)? else {
            continue;
        };
        match apply_key(&mut password, key) {
            Entry::Continue => {}
            Entry::Submit => return Ok(password),
            Entry::Cancel => return Err(CiError::auth("credential entry cancelled")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Continue,
    Submit,
    Cancel,
}

fn apply_key(buf: &mut String, key: KeyEvent) -> Entry {
    // Windows reports releases too.
    if key.kind != KeyEventKind::Press {
        return Entry::Continue;
    }
    match key.code {
        KeyCode::Enter => Entry::Submit,
        KeyCode::Esc => Entry::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Entry::Cancel,
        KeyCode::Char(c) => {
            buf.push(c);
            Entry::Continue
        }
        KeyCode::Backspace => {
            buf.pop();
            Entry::Continue
        }
        _ => Entry::Continue,
    }
}

fn prompt_error(e: io::Error) -> CiError {
    CiError::Auth {
        message: format!("failed to read credentials: {e}"),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut buf = String::new();
        for c in "hunter3".chars() {
            assert_eq!(apply_key(&mut buf, press(KeyCode::Char(c))), Entry::Continue);
        }
        apply_key(&mut buf, press(KeyCode::Backspace));
        apply_key(&mut buf, press(KeyCode::Char('2')));
        assert_eq!(apply_key(&mut buf, press(KeyCode::Enter)), Entry::Submit);
        assert_eq!(buf, "hunter2");
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut buf = String::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut buf, key), Entry::Cancel);
        assert!(buf.is_empty());
    }
}
