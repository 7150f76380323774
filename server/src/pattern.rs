//! Translation of OSC address patterns into regular expressions.

use log::debug;
use regex::Regex;

/// Rewrites an OSC address pattern in regex syntax: `*` matches any run
/// of characters, `?` any single character, `{a,b}` becomes the
/// alternation `(a|b)`, and `[...]` character classes already read as
/// regex and pass through unchanged. `.`, `(` and `)` are escaped so
/// literal address characters stay literal.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    for c in pattern.chars() {
        match c {
            '.' => out.push_str(r"\."),
            '(' => out.push_str(r"\("),
            ')' => out.push_str(r"\)"),
            '*' => out.push_str(".*"),
            '{' => out.push('('),
            ',' => out.push('|'),
            '}' => out.push(')'),
            '?' => out.push('.'),
            other => out.push(other),
        }
    }
    out
}

/// Compiles an address pattern. Matching is unanchored (substring
/// semantics, so `/a` also matches `/a/b`). A pattern that is not
/// valid regex syntax after translation matches nothing.
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(&translate(pattern)) {
        Ok(regex) => Some(regex),
        Err(err) => {
            debug!("unmatchable address pattern {pattern:?}: {err}");
            None
        }
    }
}
