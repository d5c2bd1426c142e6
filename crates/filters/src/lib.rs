#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which paths of a directory walk participate in an rsync
//! transfer and which destination paths may be removed by a deletion pass.
//! It understands rsync's textual filter grammar: `+`/`-` include and exclude
//! rules, `P`/`R` protect and risk rules, eager `merge` files, lazily loaded
//! per-directory `dir-merge` files, and the `!`/`clear` list reset.
//!
//! # Design
//!
//! - [`FilterRule`] is one compiled directive. Its path expression is
//!   matched literally when it has no wildcard characters and through a
//!   translated regular expression otherwise.
//! - [`RuleList`] is an ordered sequence of rules evaluated first-match-wins,
//!   producing a ternary [`Verdict`].
//! - [`RuleModifiers`] parses the prefix token of a rule line (`+`, `:e`,
//!   `dir-merge,n`, `protect`, ...) into a [`RuleDirective`].
//! - [`FilterScope`] holds the transfer and deletion lists of one directory
//!   together with an [`Arc`](std::sync::Arc) link to the enclosing
//!   directory's scope. Child scopes load the declared dir-merge file on
//!   construction.
//!
//! # Invariants
//!
//! - Within a list the first matching rule wins; rules that only apply to
//!   directories are skipped for other entries.
//! - Local rules always take precedence over inherited rules.
//! - A scope that received the `n` modifier never consults its ancestors,
//!   while its descendants still see its own rules.
//! - After `!` or `clear` a scope owns no rules, no parent and no dir-merge
//!   declaration.
//! - Neutral verdicts count as include for transfers and as risk for
//!   deletion.
//!
//! # Errors
//!
//! Reading rules reports [`FilterError`]. Syntax problems are rejected before
//! the scope changes; unreadable merge files surface as
//! [`FilterError::Resource`]. [`FilterError::kind`] groups the variants into
//! [`FilterErrorKind::Syntax`] and [`FilterErrorKind::Resource`].
//!
//! # Examples
//!
//! ```
//! use filters::{DecisionContext, FilterScope, Verdict};
//!
//! let scope = FilterScope::from_rules([
//!     "+ /dir1/file2",
//!     "- *",
//!     "P /dir1/keep",
//! ])
//! .expect("rules parse");
//!
//! assert_eq!(
//!     scope.check("./dir1/file1", false, DecisionContext::Transfer),
//!     Verdict::Excluded
//! );
//! assert!(scope.include("./dir1/file2", false));
//! assert!(scope.protect("./dir1/keep", false));
//! ```
//!
//! # See also
//!
//! - [`debug_filter`] for the tracing hooks emitted under `rsync::filter`.
//! - The FILTER RULES section of rsync(1) for the grammar.

mod action;
pub mod debug_filter;
mod decision;
mod error;
mod modifiers;
mod pattern;
mod rule;
mod scope;

pub use action::{Classification, Polarity};
pub use decision::{DecisionContext, RuleList, Verdict};
pub use error::{FilterError, FilterErrorKind};
pub use modifiers::{MergeOptions, RuleDirective, RuleModifiers};
pub use rule::FilterRule;
pub use scope::FilterScope;

#[cfg(test)]
mod tests;
