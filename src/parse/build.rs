//! Turn a validated token queue into a [`ParsedLine`].
//!
//! The queue is consumed front to back. Structural rules that the queue
//! checks cannot see (redirection order inside a single command, missing
//! program names, `cd` mixed with operators) are enforced here.

use std::mem;
use std::path::PathBuf;

use super::queue::TokenQueue;
use super::types::{Command, ParsedLine, Pipeline, Token, TokenKind};
use crate::error::GrammarError;

const BUILTIN_CD: &str = "cd";

/// Consume `queue` and build the command (or pipeline) it describes.
pub fn build(mut queue: TokenQueue) -> Result<ParsedLine, GrammarError> {
    if queue.is_empty() {
        return Ok(ParsedLine::Empty);
    }

    let mut stages = Vec::new();
    let mut current = Vec::new();
    while let Some(token) = queue.dequeue() {
        if token.kind() == TokenKind::Pipe {
            stages.push(mem::take(&mut current));
        } else {
            current.push(token);
        }
    }
    stages.push(current);
    queue.reset();

    if stages.len() == 1 {
        single(stages.remove(0))
    } else {
        pipeline(stages)
    }
}

/// `cmd args... [<IN] [>OUT]`, the two redirections in either order.
fn single(tokens: Vec<Token>) -> Result<ParsedLine, GrammarError> {
    let mut command = Command::default();
    // First redirection seen; only redirections may follow it.
    let mut trailing: Option<TokenKind> = None;

    for token in tokens {
        let kind = token.kind();
        match kind {
            TokenKind::Word => {
                if let Some(previous) = trailing {
                    return Err(misplaced(previous, &command, token));
                }
                command.argv.push(token.into_string());
            }
            TokenKind::Input | TokenKind::Output => {
                if command.argv.is_empty() {
                    return Err(GrammarError::MissingCommand {
                        token: token.to_string(),
                    });
                }
                if command.program() == BUILTIN_CD {
                    return Err(GrammarError::BuiltinCombined);
                }
                let path = target(&token)?;
                let slot = if kind == TokenKind::Input {
                    &mut command.input
                } else {
                    &mut command.output
                };
                if slot.is_some() {
                    return Err(GrammarError::DuplicateRedirection {
                        kind: if kind == TokenKind::Input { "input" } else { "output" },
                    });
                }
                *slot = Some(path);
                trailing.get_or_insert(kind);
            }
            TokenKind::Pipe => unreachable!("stages never contain pipe tokens"),
        }
    }

    if command.program() == BUILTIN_CD {
        return Ok(ParsedLine::Cd(command.args().to_vec()));
    }
    Ok(ParsedLine::Single(command))
}

/// Each stage is `cmd args...`; the first may end in `<IN`, the last in `>OUT`.
fn pipeline(stages: Vec<Vec<Token>>) -> Result<ParsedLine, GrammarError> {
    let last = stages.len() - 1;
    let mut commands = Vec::with_capacity(stages.len());

    for (index, tokens) in stages.into_iter().enumerate() {
        let mut command = Command::default();
        let count = tokens.len();

        for (position, token) in tokens.into_iter().enumerate() {
            let at_end = position + 1 == count;
            match token.kind() {
                TokenKind::Word => command.argv.push(token.into_string()),
                TokenKind::Input => {
                    if index != 0 || !at_end {
                        return Err(GrammarError::MisplacedInput {
                            token: token.to_string(),
                        });
                    }
                    if command.argv.is_empty() {
                        return Err(GrammarError::MissingCommand {
                            token: token.to_string(),
                        });
                    }
                    command.input = Some(target(&token)?);
                }
                TokenKind::Output => {
                    if index != last || !at_end {
                        return Err(GrammarError::MisplacedOutput {
                            token: token.to_string(),
                        });
                    }
                    if command.argv.is_empty() {
                        return Err(GrammarError::MissingCommand {
                            token: token.to_string(),
                        });
                    }
                    command.output = Some(target(&token)?);
                }
                TokenKind::Pipe => unreachable!("stages never contain pipe tokens"),
            }
        }

        if command.argv.is_empty() {
            return Err(GrammarError::MissingCommand { token: "|".into() });
        }
        if command.program() == BUILTIN_CD {
            return Err(GrammarError::BuiltinCombined);
        }
        commands.push(command);
    }

    Ok(ParsedLine::Pipeline(Pipeline::new(commands)))
}

fn target(token: &Token) -> Result<PathBuf, GrammarError> {
    match token.target() {
        Some(path) => Ok(PathBuf::from(path)),
        None => Err(GrammarError::BareRedirection {
            operator: if token.kind() == TokenKind::Input { '<' } else { '>' },
        }),
    }
}

/// Error for a word that shows up after a redirection.
fn misplaced(previous: TokenKind, command: &Command, word: Token) -> GrammarError {
    let path = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| word.to_string())
    };
    if previous == TokenKind::Input {
        GrammarError::MisplacedInput {
            token: format!("<{}", path(&command.input)),
        }
    } else {
        GrammarError::MisplacedOutput {
            token: format!(">{}", path(&command.output)),
        }
    }
}
