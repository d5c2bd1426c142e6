//! Translation of rsync path expressions into matchers.
//!
//! Expressions without wildcard characters are matched literally: anchored
//! literals match on a path-component prefix boundary, unanchored literals
//! match the tail of the candidate. Expressions containing `*`, `?` or `[`
//! are translated into an anchored regular expression:
//!
//! | glob   | regex    | meaning                                   |
//! |--------|----------|-------------------------------------------|
//! | `?`    | `[^/]`   | one character other than `/`              |
//! | `*`    | `[^/]*`  | zero or more characters within a segment  |
//! | `**`   | `.*`     | zero or more characters, crossing `/`     |
//! | `[..]` | `[..]`   | character class (`!` or `^` negates)      |
//!
//! A lone `*` matches zero or more characters, so `a*b` matches `ab`.
//!
//! Unanchored globs may match the whole candidate or any suffix that starts
//! right after a `/`, which is how `*.txt` matches `./dir/notes.txt`.

use regex::Regex;

use crate::FilterError;

/// Returns `true` when the expression must be compiled as a glob.
pub(crate) fn has_wildcards(expression: &str) -> bool {
    expression.contains(['*', '?', '['])
}

/// Compiled form of a rule's path expression.
#[derive(Clone, Debug)]
pub(crate) enum PathMatcher {
    Literal { path: String, anchored: bool },
    Glob { regex: Regex },
}

impl PathMatcher {
    /// Compiles `path`, which already carries the leading `.` when anchored
    /// and the trailing `/` when the rule is directory-only.
    pub(crate) fn compile(path: &str, anchored: bool) -> Result<Self, FilterError> {
        if !has_wildcards(path) {
            return Ok(Self::Literal {
                path: path.to_owned(),
                anchored,
            });
        }

        let source = glob_to_regex(path, anchored);
        let regex = Regex::new(&source).map_err(|source| FilterError::Pattern {
            pattern: path.to_owned(),
            source,
        })?;
        Ok(Self::Glob { regex })
    }

    pub(crate) fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Literal {
                path,
                anchored: true,
            } => literal_prefix_match(candidate, path),
            Self::Literal {
                path,
                anchored: false,
            } => literal_tail_match(candidate, path),
            Self::Glob { regex } => regex.is_match(candidate),
        }
    }
}

/// Equal to `path`, or `path` followed by a `/` boundary.
fn literal_prefix_match(candidate: &str, path: &str) -> bool {
    if candidate == path {
        return true;
    }
    candidate.starts_with(path) && candidate.as_bytes().get(path.len()) == Some(&b'/')
}

fn literal_tail_match(candidate: &str, path: &str) -> bool {
    if candidate == path {
        return true;
    }
    candidate
        .strip_suffix(path)
        .is_some_and(|head| head.ends_with('/'))
}

/// Builds the regular expression source for a glob.
///
/// The result is anchored at both ends; unanchored globs get an optional
/// `(?:.*/)?` prefix so they can match any trailing run of path segments.
pub(crate) fn glob_to_regex(glob: &str, anchored: bool) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 12);
    out.push_str(if anchored { "^" } else { "^(?:.*/)?" });

    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '?' => out.push_str("[^/]"),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    while chars.get(i + 1) == Some(&'*') {
                        i += 1;
                    }
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => out.push_str("\\["),
            },
            '\\' => match chars.get(i + 1) {
                Some(next) => {
                    push_literal(&mut out, *next);
                    i += 1;
                }
                None => out.push_str("\\\\"),
            },
            other => push_literal(&mut out, other),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Finds the `]` closing the class opened at `start`. A `]` directly after
/// the opening bracket (or after a negation mark) is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!' | '^')) {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn push_class(out: &mut String, body: &[char]) {
    out.push('[');
    let mut members = body;
    if let Some(('!' | '^', rest)) = members.split_first() {
        out.push('^');
        members = rest;
    }
    for &ch in members {
        match ch {
            '\\' | '[' | ']' | '&' | '~' | '^' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push(']');
}

fn push_literal(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}
