//! ubash: a tiny interactive shell.
//!
//! Prints `<cwd>$ `, reads one line at a time from stdin and hands it to the
//! core. Handles:
//!   - Pipes: `a | b | c`
//!   - Redirections fused to their path: `<in.txt`, `>out.txt`
//!   - Variables: `$name` (looked up upper-cased)
//!   - The `cd` builtin
//!
//! End of input (Ctrl+D) exits.

use std::io::{self, BufRead, Write};

use ubash::Shell;
use ubash::config::Config;

fn print_prompt(suffix: &str) {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(_) => "?".to_string(),
    };
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{cwd}{suffix}");
    let _ = stdout.flush();
}

fn main() {
    let config = Config::load();
    ubash::logging::init(&config.settings);
    let shell = Shell::from_config(&config);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print_prompt(&config.settings.prompt_suffix);
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!("^D");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("ubash: failed to read input: {e}");
                std::process::exit(1);
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        shell.execute(&line);
    }
}
