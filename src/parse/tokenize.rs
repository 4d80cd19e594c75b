use log::debug;

use super::grammar;
use super::queue::TokenQueue;
use super::types::Token;
use crate::error::GrammarError;

/// Output of [`tokenize`]: the filled queue and how many pipes it contains.
#[derive(Debug, Clone)]
pub struct Tokenized {
    pub queue: TokenQueue,
    pub pipes: usize,
}

/// Strip the line terminator and turn every tab into a space.
pub fn normalize(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.replace('\t', " ")
}

/// Split a raw line into pipe-delimited segments and each segment into
/// space-delimited tokens.
///
/// `$name` tokens are replaced by the value of the upper-cased variable
/// returned by `lookup`. A `|` token is enqueued between segments, and the
/// per-segment redirection check runs after every segment.
pub fn tokenize<F>(line: &str, lookup: F) -> Result<Tokenized, GrammarError>
where
    F: Fn(&str) -> Option<String>,
{
    let line = normalize(line);
    if line.starts_with('|') || line.ends_with('|') {
        return Err(GrammarError::PipeAtEdge);
    }

    // At most one token per two bytes, separators included.
    let mut queue = TokenQueue::with_capacity(line.len() / 2 + 1);
    let mut pipes = 0;

    let mut segments = line.split('|').peekable();
    while let Some(segment) = segments.next() {
        for word in segment.split(' ').filter(|w| !w.is_empty()) {
            if let Some(token) = expand(word, &lookup)? {
                queue.enqueue(token);
            }
        }
        if segments.peek().is_some() {
            queue.enqueue(Token::pipe());
            pipes += 1;
        }
        grammar::check_segment(&queue)?;
    }

    debug!("tokenized {} token(s), {pipes} pipe(s)", queue.size());
    Ok(Tokenized { queue, pipes })
}

/// Resolve a `$name` word; other words pass through. Empty values vanish.
fn expand<F>(word: &str, lookup: &F) -> Result<Option<Token>, GrammarError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(name) = word.strip_prefix('$') else {
        return Ok(Token::new(word));
    };
    let name = name.to_ascii_uppercase();
    match lookup(&name) {
        Some(value) => Ok(Token::new(value)),
        None => Err(GrammarError::UndefinedVariable { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/user".into()),
            "GREETING" => Some("hello world".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    fn words(line: &str) -> Vec<String> {
        let t = tokenize(line, env).unwrap();
        t.queue.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn normalize_strips_terminator_and_tabs() {
        assert_eq!(normalize("ls\t-la\n"), "ls -la");
        assert_eq!(normalize("ls\r\n"), "ls");
        assert_eq!(normalize("ls"), "ls");
    }

    #[test]
    fn tokenize_simple() {
        assert_eq!(words("echo hi"), vec!["echo", "hi"]);
    }

    #[test]
    fn tokenize_collapses_space_runs() {
        assert_eq!(words("  ls    -la   /tmp  "), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn tokenize_tabs_as_spaces() {
        assert_eq!(words("ls\t\t-la"), vec!["ls", "-la"]);
    }

    #[test]
    fn tokenize_pipe_inserts_separator() {
        let t = tokenize("ls -la|wc -l", no_env).unwrap();
        assert_eq!(t.pipes, 1);
        let w: Vec<_> = t.queue.iter().map(Token::as_str).collect();
        assert_eq!(w, ["ls", "-la", "|", "wc", "-l"]);
    }

    #[test]
    fn tokenize_keeps_fused_redirections() {
        assert_eq!(words("sort <in.txt >out.txt"), vec!["sort", "<in.txt", ">out.txt"]);
    }

    #[test]
    fn tokenize_expands_variables_uppercased() {
        assert_eq!(words("echo $home"), vec!["echo", "/home/user"]);
        assert_eq!(words("echo $HOME"), vec!["echo", "/home/user"]);
    }

    #[test]
    fn tokenize_expansion_is_one_token() {
        assert_eq!(words("echo $greeting"), vec!["echo", "hello world"]);
    }

    #[test]
    fn tokenize_empty_expansion_drops_token() {
        assert_eq!(words("echo $empty x"), vec!["echo", "x"]);
    }

    #[test]
    fn tokenize_uppercases_ascii_only() {
        let err = tokenize("echo $straße", env).unwrap_err();
        assert_eq!(
            err,
            GrammarError::UndefinedVariable {
                name: "STRAßE".into()
            }
        );
    }

    #[test]
    fn tokenize_undefined_variable() {
        let err = tokenize("echo $nope", env).unwrap_err();
        assert_eq!(
            err,
            GrammarError::UndefinedVariable {
                name: "NOPE".into()
            }
        );
    }

    #[test]
    fn tokenize_rejects_leading_pipe() {
        assert_eq!(tokenize("|ls", no_env).unwrap_err(), GrammarError::PipeAtEdge);
    }

    #[test]
    fn tokenize_rejects_trailing_pipe() {
        assert_eq!(tokenize("ls|\n", no_env).unwrap_err(), GrammarError::PipeAtEdge);
    }

    #[test]
    fn tokenize_double_pipe_keeps_both_separators() {
        let t = tokenize("ls||wc", no_env).unwrap();
        let w: Vec<_> = t.queue.iter().map(Token::as_str).collect();
        assert_eq!(w, ["ls", "|", "|", "wc"]);
        assert_eq!(t.pipes, 2);
    }

    #[test]
    fn tokenize_runs_segment_check() {
        let err = tokenize("ls | wc >out | cat", no_env).unwrap_err();
        assert!(matches!(err, GrammarError::MisplacedOutput { .. }));
    }

    #[test]
    fn tokenize_empty_line() {
        let t = tokenize("   \n", no_env).unwrap();
        assert!(t.queue.is_empty());
        assert_eq!(t.pipes, 0);
    }
}
