pub mod build;
pub mod grammar;
pub mod queue;
pub mod tokenize;
pub mod types;

pub use build::build;
pub use grammar::{check_segment, check_sequence};
pub use queue::TokenQueue;
pub use tokenize::{Tokenized, normalize, tokenize};
pub use types::{Command, ParsedLine, Pipeline, Token, TokenKind};

use crate::error::GrammarError;

/// Tokenize, validate and build one input line.
///
/// `lookup` resolves `$NAME` references. Nothing is executed here, so a
/// returned error means no process was ever created for this line.
pub fn parse<F>(line: &str, lookup: F) -> Result<ParsedLine, GrammarError>
where
    F: Fn(&str) -> Option<String>,
{
    let Tokenized { queue, pipes } = tokenize(line, lookup)?;
    check_sequence(&queue)?;
    let parsed = build(queue)?;
    log::debug!("parsed line with {pipes} pipe(s): {parsed:?}");
    Ok(parsed)
}
