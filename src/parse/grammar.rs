//! Placement rules for `|`, `<` and `>`.
//!
//! Both checks read the queue in place and never remove tokens from it.

use super::queue::TokenQueue;
use super::types::{Token, TokenKind};
use crate::error::GrammarError;

/// Check the tokens after the first pipe.
///
/// Input redirection is never legal there. Output redirection must carry a
/// path and be the very last token. Without a pipe there is nothing to check.
pub fn check_segment(queue: &TokenQueue) -> Result<(), GrammarError> {
    let mut rest = queue
        .iter()
        .skip_while(|t| t.kind() != TokenKind::Pipe)
        .skip(1)
        .peekable();

    while let Some(token) = rest.next() {
        match token.kind() {
            TokenKind::Input => {
                return Err(GrammarError::MisplacedInput {
                    token: token.to_string(),
                });
            }
            TokenKind::Output => {
                if token.is_bare() {
                    return Err(GrammarError::BareRedirection { operator: '>' });
                }
                if rest.peek().is_some() {
                    return Err(GrammarError::MisplacedOutput {
                        token: token.to_string(),
                    });
                }
            }
            TokenKind::Word | TokenKind::Pipe => {}
        }
    }
    Ok(())
}

/// Check pipe adjacency over the complete queue.
pub fn check_sequence(queue: &TokenQueue) -> Result<(), GrammarError> {
    let is_pipe = |t: &Token| t.kind() == TokenKind::Pipe;

    if queue.peek().is_some_and(is_pipe) {
        return Err(GrammarError::PipeAtEdge);
    }
    for (current, next) in queue.iter().zip(queue.iter().skip(1)) {
        if !is_pipe(current) {
            continue;
        }
        match next.kind() {
            TokenKind::Pipe => return Err(GrammarError::ConsecutivePipes),
            TokenKind::Input | TokenKind::Output => {
                return Err(GrammarError::RedirectionAfterPipe {
                    token: next.to_string(),
                });
            }
            TokenKind::Word => {}
        }
    }
    if queue.iter().last().is_some_and(is_pipe) {
        return Err(GrammarError::PipeAtEdge);
    }
    Ok(())
}
