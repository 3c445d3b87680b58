//! Source positions of task keys
//!
//! `serde_yaml` values carry no positions, so the line and column of every
//! key directly under the top-level `tasks:` mapping are recovered from the
//! raw text. Block mappings are scanned line by line; keys of a flow mapping
//! are then searched for in declaration order.

use std::collections::HashMap;

/// 1-based line and column of a task key
pub type Position = (usize, usize);

/// Map each task key declared under `tasks:` to its position
pub fn locate_task_keys(source: &str) -> HashMap<String, Position> {
    let mut positions = HashMap::new();
    let mut in_tasks = false;
    let mut child_indent: Option<usize> = None;

    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indent = line.len() - trimmed.len();
        if indent == 0 {
            in_tasks = mapping_key(trimmed).as_deref() == Some("tasks");
            child_indent = None;
            continue;
        }
        if !in_tasks {
            continue;
        }

        let expected = *child_indent.get_or_insert(indent);
        if indent != expected {
            continue;
        }

        if let Some(key) = mapping_key(trimmed) {
            positions.entry(key).or_insert((idx + 1, indent + 1));
        }
    }

    positions
}

/// Fill in keys the line scan cannot see, such as those of a flow mapping
/// (`tasks: {build: cargo build, test: cargo test}`).
///
/// `names` must come in declaration order; each key is searched for after
/// the previous match.
pub fn locate_flow_keys<'n>(
    source: &str,
    names: impl IntoIterator<Item = &'n str>,
    positions: &mut HashMap<String, Position>,
) {
    let mut cursor = tasks_key_end(source).unwrap_or(0);

    for name in names {
        if positions.contains_key(name) {
            continue;
        }
        let Some(start) = find_flow_key(source, name, cursor) else {
            continue;
        };
        positions.insert(name.to_string(), position_of(source, start));
        cursor = start + name.len();
    }
}

/// Byte offset just past the colon of the top-level `tasks:` key
fn tasks_key_end(source: &str) -> Option<usize> {
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let is_tasks = !line.starts_with(char::is_whitespace)
            && mapping_key(line.trim_end()).as_deref() == Some("tasks");
        if is_tasks {
            return line.find(':').map(|colon| offset + colon + 1);
        }
        offset += line.len();
    }
    None
}

/// Earliest plain or quoted occurrence of `name` used as a flow mapping key
fn find_flow_key(source: &str, name: &str, from: usize) -> Option<usize> {
    let rest = source.get(from..)?;
    [name.to_string(), format!("\"{name}\""), format!("'{name}'")]
        .iter()
        .filter_map(|pattern| {
            rest.match_indices(pattern.as_str())
                .map(|(idx, _)| from + idx)
                .find(|&start| is_flow_key(source, start, pattern.len()))
        })
        .min()
}

fn is_flow_key(source: &str, start: usize, len: usize) -> bool {
    let opens = source[..start]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || c == '{' || c == ',');
    if !opens {
        return false;
    }

    let after = source[start + len..].trim_start_matches([' ', '\t']);
    after.strip_prefix(':').is_some_and(|value| {
        value
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == ',' || c == '}')
    })
}

fn position_of(source: &str, offset: usize) -> Position {
    let before = &source[..offset];
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    (
        before.matches('\n').count() + 1,
        before[line_start..].chars().count() + 1,
    )
}

/// Key of a `key: value` line, honouring quoted keys and colons inside names
fn mapping_key(line: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(rest) = line.strip_prefix(quote) {
            let end = rest.find(quote)?;
            let after = rest[end + 1..].trim_start();
            return after.starts_with(':').then(|| rest[..end].to_string());
        }
    }

    let bytes = line.as_bytes();
    for (pos, byte) in bytes.iter().enumerate() {
        if *byte == b'#' && pos > 0 && bytes[pos - 1] == b' ' {
            return None;
        }
        if *byte != b':' {
            continue;
        }
        let terminates = bytes
            .get(pos + 1)
            .is_none_or(|next| next.is_ascii_whitespace());
        if terminates {
            let key = line[..pos].trim_end();
            return (!key.is_empty()).then(|| key.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_task_keys() {
        let source = "\
version: '3'

tasks:
  build:
    cmds:
      - cargo build
  docs:serve: mdbook serve
  \"quoted:name\":
    desc: quoted

  # a comment
  lint: cargo clippy
vars:
  build: not-a-task
";
        let positions = locate_task_keys(source);
        assert_eq!(positions.get("build"), Some(&(4, 3)));
        assert_eq!(positions.get("docs:serve"), Some(&(7, 3)));
        assert_eq!(positions.get("quoted:name"), Some(&(8, 3)));
        assert_eq!(positions.get("lint"), Some(&(12, 3)));
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn test_nested_keys_are_ignored() {
        let source = "tasks:\n    deep:\n      cmds: [a]\n      desc: x\n";
        let positions = locate_task_keys(source);
        assert_eq!(positions.get("deep"), Some(&(2, 5)));
        assert!(!positions.contains_key("cmds"));
    }

    #[test]
    fn test_flow_mapping_keys() {
        let source = "version: '3'\ntasks: {b: echo b, 'x:y': echo x, a: echo a}\n";
        let mut positions = locate_task_keys(source);
        assert!(positions.is_empty());

        locate_flow_keys(source, ["b", "x:y", "a"], &mut positions);
        assert_eq!(positions.get("b"), Some(&(2, 9)));
        assert_eq!(positions.get("x:y"), Some(&(2, 20)));
        assert_eq!(positions.get("a"), Some(&(2, 35)));
    }

    #[test]
    fn test_flow_search_keeps_block_positions() {
        let source = "tasks:\n  a: echo a\n";
        let mut positions = locate_task_keys(source);
        locate_flow_keys(source, ["a", "missing"], &mut positions);
        assert_eq!(positions.get("a"), Some(&(2, 3)));
        assert!(!positions.contains_key("missing"));
    }

    #[test]
    fn test_mapping_key_forms() {
        assert_eq!(mapping_key("build:"), Some("build".to_string()));
        assert_eq!(mapping_key("build: cargo build"), Some("build".to_string()));
        assert_eq!(mapping_key("a:b:c:"), Some("a:b:c".to_string()));
        assert_eq!(mapping_key("'x y': z"), Some("x y".to_string()));
        assert_eq!(mapping_key("- item"), None);
        assert_eq!(mapping_key("url # http://x"), None);
    }
}
