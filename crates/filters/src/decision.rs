use std::fmt;

use crate::debug_filter::trace_filter_evaluate;
use crate::{FilterRule, Polarity};

/// Outcome of checking a candidate against a rule list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Verdict {
    /// The first applicable rule matched and has include polarity.
    Included,
    /// The first applicable rule matched and has exclude polarity.
    Excluded,
    /// No applicable rule matched.
    Neutral,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Neutral`].
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Falls back to `other` when this verdict is neutral.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match self {
            Self::Neutral => other,
            decided => decided,
        }
    }
}

impl From<Polarity> for Verdict {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Include => Self::Included,
            Polarity::Exclude => Self::Excluded,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Included => f.write_str("included"),
            Self::Excluded => f.write_str("excluded"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}

/// Selects which rule list of a scope is consulted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecisionContext {
    /// Ordinary include/exclude rules deciding what is transferred.
    Transfer,
    /// Protect/risk rules deciding what may be deleted.
    Deletion,
}

impl fmt::Display for DecisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => f.write_str("transfer"),
            Self::Deletion => f.write_str("deletion"),
        }
    }
}

/// Ordered sequence of rules evaluated with first-match-wins semantics.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RuleList {
    rules: Vec<FilterRule>,
}

impl RuleList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule to the end of the list.
    pub fn push(&mut self, rule: FilterRule) {
        self.rules.push(rule);
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the list holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterRule> {
        self.rules.iter()
    }

    /// Returns the first rule whose match result is `true`, skipping rules
    /// that do not apply to this kind of entry.
    #[must_use]
    pub fn first_match(&self, candidate: &str, is_dir: bool) -> Option<&FilterRule> {
        self.rules.iter().find(|rule| {
            let matched = rule.matches(candidate, is_dir);
            trace_filter_evaluate(candidate, rule, matched);
            matched == Some(true)
        })
    }

    /// Checks `candidate` against the list.
    ///
    /// ```
    /// use filters::{FilterRule, RuleList, Verdict};
    ///
    /// let mut list = RuleList::new();
    /// list.push(FilterRule::parse("+ /dir1/file1").unwrap());
    /// list.push(FilterRule::parse("- /dir1/*").unwrap());
    ///
    /// assert_eq!(list.check("./dir1/file1", false), Verdict::Included);
    /// assert_eq!(list.check("./dir1/file2", false), Verdict::Excluded);
    /// assert_eq!(list.check("./other", false), Verdict::Neutral);
    /// ```
    #[must_use]
    pub fn check(&self, candidate: &str, is_dir: bool) -> Verdict {
        self.first_match(candidate, is_dir)
            .map_or(Verdict::Neutral, |rule| Verdict::from(rule.polarity()))
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a FilterRule;
    type IntoIter = std::slice::Iter<'a, FilterRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FilterRule> for RuleList {
    fn from_iter<I: IntoIterator<Item = FilterRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<FilterRule> for RuleList {
    fn extend<I: IntoIterator<Item = FilterRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
