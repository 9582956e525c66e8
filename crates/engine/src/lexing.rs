//! # Command-line splitting
//!
//! Splits a synthesized command line into an argument vector. Supports single
//! and double quotes and backslash escapes; quotes are removed from the
//! resulting arguments. No variable or glob expansion takes place.
//!
//! Input that a shell would reject (an unterminated quote, a trailing
//! backslash) is an error rather than being silently repaired.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(QuoteKind),
    #[error("dangling escape at end of input")]
    DanglingEscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
}

impl std::fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Double => "double",
        })
    }
}

/// Split `input` into arguments.
///
/// # Example
/// ```rust
/// use cmdrest_engine::lexing::split_command_line;
///
/// assert_eq!(split_command_line("ls -l /tmp").unwrap(), vec!["ls", "-l", "/tmp"]);
/// assert_eq!(split_command_line("echo 'a b' \"c d\"").unwrap(), vec!["echo", "a b", "c d"]);
/// assert_eq!(split_command_line("touch a\\ b").unwrap(), vec!["touch", "a b"]);
/// assert!(split_command_line("echo it's").is_err());
/// ```
pub fn split_command_line(input: &str) -> Result<Vec<String>, LexError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_single_quotes = false;
    let mut in_double_quotes = false;
    let mut chars = input.chars();

    while let Some(character) = chars.next() {
        match character {
            '\\' if !in_single_quotes => {
                in_token = true;
                let escaped = chars.next().ok_or(LexError::DanglingEscape)?;
                current.push(escaped);
            }
            '\'' if !in_double_quotes => {
                in_token = true;
                in_single_quotes = !in_single_quotes;
            }
            '"' if !in_single_quotes => {
                in_token = true;
                in_double_quotes = !in_double_quotes;
            }
            c if c.is_whitespace() && !in_single_quotes && !in_double_quotes => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_single_quotes {
        return Err(LexError::UnterminatedQuote(QuoteKind::Single));
    }
    if in_double_quotes {
        return Err(LexError::UnterminatedQuote(QuoteKind::Double));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}
