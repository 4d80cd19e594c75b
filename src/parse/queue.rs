//! FIFO token container holding one input line.

use std::collections::VecDeque;
use std::fmt;

use super::types::Token;

/// Insertion-ordered queue of tokens for a single input line.
///
/// The capacity given at creation is only a hint; the queue grows as needed.
/// Clones share no storage with the original.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: VecDeque::with_capacity(capacity),
        }
    }

    pub fn enqueue(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    /// Remove the oldest token. `None` once everything has been removed.
    pub fn dequeue(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens still waiting to be removed.
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// Remaining tokens in order, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter()
    }

    /// Drop every token and release the backing storage.
    pub fn reset(&mut self) {
        self.tokens = VecDeque::new();
    }
}

impl Extend<Token> for TokenQueue {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}

/// One token per line.
impl fmt::Display for TokenQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Token {
        Token::new(s).unwrap()
    }

    fn queue_of(words: &[&str]) -> TokenQueue {
        let mut q = TokenQueue::with_capacity(words.len());
        q.extend(words.iter().map(|w| tok(w)));
        q
    }

    #[test]
    fn fifo_order() {
        let mut q = queue_of(&["ls", "-la", "/tmp"]);
        assert_eq!(q.dequeue().unwrap(), "ls");
        assert_eq!(q.dequeue().unwrap(), "-la");
        assert_eq!(q.dequeue().unwrap(), "/tmp");
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn size_tracks_inserts_minus_removals() {
        let mut q = queue_of(&["a", "b", "c"]);
        assert_eq!(q.size(), 3);
        q.dequeue();
        assert_eq!(q.size(), 2);
        q.enqueue(tok("d"));
        assert_eq!(q.size(), 3);
        assert!(!q.is_empty());
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut q = TokenQueue::with_capacity(1);
        for i in 0..100 {
            q.enqueue(tok(&i.to_string()));
        }
        assert_eq!(q.size(), 100);
        assert_eq!(q.dequeue().unwrap(), "0");
    }

    #[test]
    fn clone_is_independent() {
        let mut q = queue_of(&["echo", "hi"]);
        let mut copy = q.clone();
        copy.dequeue();
        copy.enqueue(tok("extra"));
        assert_eq!(q.size(), 2);
        assert_eq!(q.dequeue().unwrap(), "echo");
        assert_eq!(copy.iter().map(Token::as_str).collect::<Vec<_>>(), ["hi", "extra"]);
    }

    #[test]
    fn reset_empties_queue() {
        let mut q = queue_of(&["a", "b"]);
        q.reset();
        assert!(q.is_empty());
        assert_eq!(q.size(), 0);
        assert!(q.peek().is_none());
    }

    #[test]
    fn display_one_token_per_line() {
        let q = queue_of(&["ls", "|", "wc"]);
        assert_eq!(q.to_string(), "ls\n|\nwc\n");
    }
}
