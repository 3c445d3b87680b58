//! Wildcard task names
//!
//! A task declared as `deploy:*` answers to `deploy:prod`, `deploy:staging`,
//! and so on. Every `*` captures the text it stands for so callers can hand
//! the values on to the task.

use regex::Regex;
use tracing::debug;

/// Match `candidate` against a task name `pattern` containing `*` wildcards.
///
/// Returns whether the whole candidate matched, together with the text
/// captured by each wildcard in order.
pub fn wildcard_match(pattern: &str, candidate: &str) -> (bool, Vec<String>) {
    let expected = pattern.matches('*').count();

    let regex = match compile(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            debug!("Wildcard pattern {:?} did not compile: {}", pattern, e);
            return (false, Vec::new());
        }
    };

    let Some(captures) = regex.captures(candidate) else {
        return (false, Vec::new());
    };

    let wildcards: Vec<String> = captures
        .iter()
        .skip(1)
        .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect();

    if wildcards.len() != expected {
        return (false, wildcards);
    }

    (true, wildcards)
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("(.*)");
    Regex::new(&format!("^{body}$"))
}
