use std::borrow::Cow;
use std::fmt;

use crate::modifiers::{RuleDirective, RuleModifiers};
use crate::pattern::PathMatcher;
use crate::{Classification, FilterError, Polarity};

pub(crate) const RULE_FORMAT_HINT: &str =
    "invalid format: should be '<+|-|P|R|merge|dir-merge>[,<modifier>] <path-expression>'";

/// One compiled filter directive.
///
/// A rule is built from a line such as `+ /some/path`, `- *.tmp`,
/// `P /keep/` or `+ !/.svn/`. The path expression may carry three markers:
///
/// - a leading `!` negates the match,
/// - a leading `/` (after any `!`) anchors the expression at the scope root,
///   stored internally with a leading `.` so it lines up with candidates of
///   the form `./dir/file`,
/// - a trailing `/` restricts the rule to directories.
///
/// Rules are immutable once constructed.
#[derive(Clone, Debug)]
pub struct FilterRule {
    polarity: Polarity,
    classification: Classification,
    pattern: String,
    anchored: bool,
    directory_only: bool,
    negated: bool,
    matcher: PathMatcher,
}

impl FilterRule {
    /// Parses a two-field rule line (`<prefix> <path-expression>`).
    ///
    /// Merge and dir-merge directives are rejected here; they only make sense
    /// when read by a [`FilterScope`](crate::FilterScope).
    ///
    /// # Examples
    ///
    /// ```
    /// use filters::{Classification, FilterRule, Polarity};
    ///
    /// let rule = FilterRule::parse("- /build/").unwrap();
    /// assert_eq!(rule.polarity(), Polarity::Exclude);
    /// assert_eq!(rule.classification(), Classification::Ordinary);
    /// assert!(rule.is_anchored());
    /// assert!(rule.is_directory_only());
    /// assert_eq!(rule.matches("./build", true), Some(true));
    /// assert_eq!(rule.matches("./build", false), None);
    /// ```
    pub fn parse(line: &str) -> Result<Self, FilterError> {
        let (token, expression) = split_rule_line(line)?;
        match RuleModifiers::parse(token, line)?.directive() {
            RuleDirective::Rule {
                polarity,
                classification,
            } => Self::build(polarity, classification, expression, line),
            RuleDirective::Merge(_) | RuleDirective::DirMerge(_) => Err(FilterError::syntax(
                line,
                "merge directives can only be read by a filter scope",
            )),
        }
    }

    /// Builds a rule from its parts without going through the prefix parser.
    pub fn new(
        polarity: Polarity,
        classification: Classification,
        expression: &str,
    ) -> Result<Self, FilterError> {
        let line = format!("{} {expression}", prefix_for(polarity, classification));
        Self::build(polarity, classification, expression, &line)
    }

    /// Creates an ordinary include rule.
    pub fn include(expression: &str) -> Result<Self, FilterError> {
        Self::new(Polarity::Include, Classification::Ordinary, expression)
    }

    /// Creates an ordinary exclude rule.
    pub fn exclude(expression: &str) -> Result<Self, FilterError> {
        Self::new(Polarity::Exclude, Classification::Ordinary, expression)
    }

    /// Creates a protect rule.
    pub fn protect(expression: &str) -> Result<Self, FilterError> {
        Self::new(Polarity::Exclude, Classification::Protect, expression)
    }

    /// Creates a risk rule.
    pub fn risk(expression: &str) -> Result<Self, FilterError> {
        Self::new(Polarity::Include, Classification::Risk, expression)
    }

    pub(crate) fn build(
        polarity: Polarity,
        classification: Classification,
        expression: &str,
        line: &str,
    ) -> Result<Self, FilterError> {
        let mut core = expression;

        let directory_only = core.ends_with('/');
        if directory_only {
            core = &core[..core.len() - 1];
        }

        let negated = core.starts_with('!');
        if negated {
            core = &core[1..];
        }

        let anchored = core.starts_with('/');
        if anchored {
            core = &core[1..];
        }

        if core.is_empty() {
            return Err(FilterError::syntax(line, "missing a path expression"));
        }

        let mut path = String::with_capacity(core.len() + 3);
        if anchored {
            path.push_str("./");
        }
        path.push_str(core);
        if directory_only {
            path.push('/');
        }

        let matcher = PathMatcher::compile(&path, anchored)?;

        Ok(Self {
            polarity,
            classification,
            pattern: core.to_owned(),
            anchored,
            directory_only,
            negated,
            matcher,
        })
    }

    /// Returns the rule polarity.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns the rule classification.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Returns the path expression with its markers removed.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns whether the expression began with `/`.
    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Returns whether the expression ended with `/`.
    #[must_use]
    pub const fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// Returns whether the expression began with `!`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns `false` when the rule must be skipped for this kind of entry.
    #[must_use]
    pub const fn applies_to(&self, is_dir: bool) -> bool {
        is_dir || !self.directory_only
    }

    /// Matches a candidate path of the form `./dir/file`.
    ///
    /// Returns `None` when the rule does not apply because it is
    /// directory-only and the candidate is not a directory. Otherwise the
    /// result is the raw match inverted when the rule is negated.
    ///
    /// Directory-only rules see the candidate with a trailing `/`; all other
    /// rules see it without one, so `- foo` excludes both a file and a
    /// directory named `foo`.
    #[must_use]
    pub fn matches(&self, candidate: &str, is_dir: bool) -> Option<bool> {
        if !self.applies_to(is_dir) {
            return None;
        }

        let subject: Cow<'_, str> = if self.directory_only {
            if candidate.ends_with('/') {
                Cow::Borrowed(candidate)
            } else {
                Cow::Owned(format!("{candidate}/"))
            }
        } else {
            match candidate.strip_suffix('/') {
                Some(trimmed) if !trimmed.is_empty() => Cow::Borrowed(trimmed),
                _ => Cow::Borrowed(candidate),
            }
        };

        Some(self.matcher.is_match(&subject) != self.negated)
    }
}

impl PartialEq for FilterRule {
    fn eq(&self, other: &Self) -> bool {
        self.polarity == other.polarity
            && self.classification == other.classification
            && self.pattern == other.pattern
            && self.anchored == other.anchored
            && self.directory_only == other.directory_only
            && self.negated == other.negated
    }
}

impl Eq for FilterRule {}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}{}{}",
            prefix_for(self.polarity, self.classification),
            if self.negated { "!" } else { "" },
            if self.anchored { "/" } else { "" },
            self.pattern,
            if self.directory_only { "/" } else { "" },
        )
    }
}

const fn prefix_for(polarity: Polarity, classification: Classification) -> char {
    match classification {
        Classification::Protect => 'P',
        Classification::Risk => 'R',
        Classification::Ordinary => polarity.prefix(),
    }
}

/// Splits a rule line into its prefix token and path expression.
pub(crate) fn split_rule_line(line: &str) -> Result<(&str, &str), FilterError> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(token), Some(expression), None) => Ok((token, expression)),
        _ => Err(FilterError::syntax(line, RULE_FORMAT_HINT)),
    }
}
