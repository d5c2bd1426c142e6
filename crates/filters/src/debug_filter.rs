//! DEBUG_FILTER tracing for rule parsing, merge files and rule evaluation.
//!
//! Every event is emitted under the `rsync::filter` target so a subscriber can
//! map it onto the `--debug=filter` flag. All tracing is conditionally compiled
//! behind the `tracing` feature flag and produces no-op inline functions when
//! disabled.
//!
//! # Examples
//!
//! ```rust,ignore
//! use filters::debug_filter::{FilterTracer, trace_filter_rule_added};
//! use filters::{DecisionContext, FilterRule, Verdict};
//! use std::path::Path;
//!
//! let mut tracer = FilterTracer::new();
//!
//! let rule = FilterRule::parse("- *.tmp")?;
//! trace_filter_rule_added(Path::new("."), &rule, DecisionContext::Transfer);
//! tracer.record_rule_added();
//!
//! tracer.record_evaluation(Verdict::Excluded);
//! tracer.summary();
//! ```

use std::path::Path;

use crate::{DecisionContext, FilterRule, Verdict};

/// Target name for tracing events, matching rsync's debug category.
#[cfg(feature = "tracing")]
const FILTER_TARGET: &str = "rsync::filter";

// ============================================================================
// Tracing functions (feature-gated)
// ============================================================================

/// Traces a rule being appended to one of a scope's lists.
///
/// # Arguments
///
/// * `directory` - Directory owning the scope
/// * `rule` - The rule, logged in its canonical form (e.g. `- /build/`)
/// * `context` - Which list received the rule
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_rule_added(directory: &Path, rule: &FilterRule, context: DecisionContext) {
    tracing::debug!(
        target: FILTER_TARGET,
        directory = %directory.display(),
        rule = %rule,
        list = %context,
        "filter_rule_added"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_rule_added(_directory: &Path, _rule: &FilterRule, _context: DecisionContext) {}

/// Traces a `!` / `clear` directive emptying a scope.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_list_cleared(directory: &Path) {
    tracing::debug!(
        target: FILTER_TARGET,
        directory = %directory.display(),
        "filter_list_cleared"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_list_cleared(_directory: &Path) {}

/// Traces evaluation of a candidate against one rule.
///
/// `matched` is `None` when the rule was skipped because it only applies to
/// directories.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_evaluate(path: &str, rule: &FilterRule, matched: Option<bool>) {
    tracing::trace!(
        target: FILTER_TARGET,
        path = %path,
        rule = %rule,
        matched = ?matched,
        "filter_evaluate"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_evaluate(_path: &str, _rule: &FilterRule, _matched: Option<bool>) {}

/// Traces the verdict a scope chain reached for a path.
///
/// # Arguments
///
/// * `path` - The candidate that was evaluated
/// * `context` - Transfer or deletion
/// * `verdict` - Final verdict after climbing the scope chain
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_decision(path: &str, context: DecisionContext, verdict: Verdict) {
    tracing::debug!(
        target: FILTER_TARGET,
        path = %path,
        context = %context,
        verdict = %verdict,
        "filter_decision"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_decision(_path: &str, _context: DecisionContext, _verdict: Verdict) {}

/// Traces an eager merge of a rule file into a scope.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_merge_file(directory: &Path, rules_file: &Path, rule_count: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        directory = %directory.display(),
        rules_file = %rules_file.display(),
        rule_count = rule_count,
        "merge_file"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_merge_file(_directory: &Path, _rules_file: &Path, _rule_count: usize) {}

/// Traces loading of a per-directory merge file into a child scope.
///
/// # Arguments
///
/// * `dir` - The directory containing the merge file
/// * `rules_file` - The name of the rules file being loaded
/// * `rule_count` - Number of rules loaded from the file
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_dir_merge_load(dir: &Path, rules_file: &str, rule_count: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        dir = %dir.display(),
        rules_file = %rules_file,
        rule_count = rule_count,
        "dir_merge_load"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_dir_merge_load(_dir: &Path, _rules_file: &str, _rule_count: usize) {}

/// Traces summary statistics for filter operations.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_summary(
    total_evaluated: usize,
    total_included: usize,
    total_excluded: usize,
    total_neutral: usize,
) {
    tracing::info!(
        target: FILTER_TARGET,
        total_evaluated = total_evaluated,
        total_included = total_included,
        total_excluded = total_excluded,
        total_neutral = total_neutral,
        "filter_summary"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_summary(
    _total_evaluated: usize,
    _total_included: usize,
    _total_excluded: usize,
    _total_neutral: usize,
) {
}

// ============================================================================
// FilterTracer - stateful tracer for aggregating filter statistics
// ============================================================================

/// Aggregates statistics across a filtering session.
///
/// Neutral verdicts are counted separately because callers treat them as
/// "include" for transfers but they did not match any rule.
///
/// ```
/// use filters::Verdict;
/// use filters::debug_filter::FilterTracer;
///
/// let mut tracer = FilterTracer::new();
/// tracer.record_rule_added();
/// tracer.record_evaluation(Verdict::Included);
/// tracer.record_evaluation(Verdict::Excluded);
/// tracer.record_evaluation(Verdict::Neutral);
///
/// assert_eq!(tracer.rules_added(), 1);
/// assert_eq!(tracer.total_evaluated(), 3);
/// assert_eq!(tracer.total_included(), 1);
/// assert_eq!(tracer.total_neutral(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterTracer {
    rules_added: usize,
    total_evaluated: usize,
    total_included: usize,
    total_excluded: usize,
    total_neutral: usize,
    dir_merges: usize,
}

impl FilterTracer {
    /// Creates a new filter tracer with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules_added: 0,
            total_evaluated: 0,
            total_included: 0,
            total_excluded: 0,
            total_neutral: 0,
            dir_merges: 0,
        }
    }

    /// Records that a rule was appended to a scope.
    pub fn record_rule_added(&mut self) {
        self.rules_added += 1;
    }

    /// Records a verdict.
    pub fn record_evaluation(&mut self, verdict: Verdict) {
        self.total_evaluated += 1;
        match verdict {
            Verdict::Included => self.total_included += 1,
            Verdict::Excluded => self.total_excluded += 1,
            Verdict::Neutral => self.total_neutral += 1,
        }
    }

    /// Records a per-directory merge file that contributed `rule_count` rules.
    pub fn record_dir_merge(&mut self, rule_count: usize) {
        self.dir_merges += 1;
        self.rules_added += rule_count;
    }

    /// Emits a summary trace event with all accumulated statistics.
    pub fn summary(&self) {
        trace_filter_summary(
            self.total_evaluated,
            self.total_included,
            self.total_excluded,
            self.total_neutral,
        );
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the number of rules added.
    #[must_use]
    pub const fn rules_added(&self) -> usize {
        self.rules_added
    }

    /// Returns the total number of verdicts recorded.
    #[must_use]
    pub const fn total_evaluated(&self) -> usize {
        self.total_evaluated
    }

    /// Returns the number of [`Verdict::Included`] verdicts.
    #[must_use]
    pub const fn total_included(&self) -> usize {
        self.total_included
    }

    /// Returns the number of [`Verdict::Excluded`] verdicts.
    #[must_use]
    pub const fn total_excluded(&self) -> usize {
        self.total_excluded
    }

    /// Returns the number of [`Verdict::Neutral`] verdicts.
    #[must_use]
    pub const fn total_neutral(&self) -> usize {
        self.total_neutral
    }

    /// Returns the number of per-directory merge files loaded.
    #[must_use]
    pub const fn dir_merges(&self) -> usize {
        self.dir_merges
    }

    /// Returns the share of verdicts that let the path through
    /// (included or neutral).
    ///
    /// Returns 0.0 if nothing has been evaluated.
    #[must_use]
    pub fn pass_ratio(&self) -> f64 {
        if self.total_evaluated == 0 {
            0.0
        } else {
            ((self.total_included + self.total_neutral) as f64) / (self.total_evaluated as f64)
        }
    }
}
