//! Types produced by the tokenizer and consumed by the executors.

use std::fmt;
use std::path::PathBuf;

/// Classification of a token: the lone `|` separator, a redirection by its
/// first byte, or a plain word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Program name or argument.
    Word,
    /// `|`: pipe separator
    Pipe,
    /// `<PATH`: input redirection
    Input,
    /// `>PATH`: output redirection
    Output,
}

/// A single lexical unit of an input line. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Wrap `text` as a token; `None` when it is empty.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() { None } else { Some(Self(text)) }
    }

    /// The `|` separator inserted between segments.
    pub fn pipe() -> Self {
        Self("|".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Only the exact text `|` separates stages; `|tee` from an expansion
    /// stays a word.
    pub fn kind(&self) -> TokenKind {
        if self.0 == "|" {
            return TokenKind::Pipe;
        }
        match self.0.as_bytes().first() {
            Some(b'<') => TokenKind::Input,
            Some(b'>') => TokenKind::Output,
            _ => TokenKind::Word,
        }
    }

    /// Operator token with nothing fused to it (`<` or `>` alone).
    pub fn is_bare(&self) -> bool {
        self.kind() != TokenKind::Word && self.0.len() == 1
    }

    /// Path fused to a redirection operator: `out.txt` for `>out.txt`.
    pub fn target(&self) -> Option<&str> {
        match self.kind() {
            TokenKind::Input | TokenKind::Output if !self.is_bare() => Some(&self.0[1..]),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One external program invocation with its optional redirections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Program name followed by its arguments.
    pub argv: Vec<String>,
    /// File bound to standard input (`<PATH`).
    pub input: Option<PathBuf>,
    /// File bound to standard output (`>PATH`), created or truncated.
    pub output: Option<PathBuf>,
}

impl Command {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn has_redirection(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }
}

/// Two or more commands joined by pipes, left to right.
///
/// Only the first stage carries an input redirection and only the last
/// one an output redirection; `cd` is never a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Command>,
}

impl Pipeline {
    /// Callers guarantee at least two stages.
    pub(crate) fn new(stages: Vec<Command>) -> Self {
        debug_assert!(stages.len() >= 2);
        Self { stages }
    }

    pub fn stages(&self) -> &[Command] {
        &self.stages
    }

    /// Number of OS pipes needed to connect the stages.
    pub fn pipe_count(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<&Command> {
        self.stages.first()
    }

    pub fn last(&self) -> Option<&Command> {
        self.stages.last()
    }
}

/// A validated line, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Nothing but whitespace.
    Empty,
    /// The `cd` builtin and its arguments (without `cd` itself).
    Cd(Vec<String>),
    /// A single command, possibly redirected.
    Single(Command),
    /// A pipe sequence.
    Pipeline(Pipeline),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> TokenKind {
        Token::new(text).unwrap().kind()
    }

    #[test]
    fn kind_by_first_byte() {
        assert_eq!(kind("ls"), TokenKind::Word);
        assert_eq!(kind("<in.txt"), TokenKind::Input);
        assert_eq!(kind(">out.txt"), TokenKind::Output);
        assert_eq!(kind("|"), TokenKind::Pipe);
    }

    #[test]
    fn pipe_prefixed_text_is_a_word() {
        assert_eq!(kind("|tee"), TokenKind::Word);
        assert_eq!(kind("||"), TokenKind::Word);
        assert!(!Token::new("|tee").unwrap().is_bare());
    }

    #[test]
    fn target_strips_operator() {
        assert_eq!(Token::new(">out.txt").unwrap().target(), Some("out.txt"));
        assert_eq!(Token::new(">").unwrap().target(), None);
        assert_eq!(Token::new("ls").unwrap().target(), None);
    }
}
