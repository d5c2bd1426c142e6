//! Tests for negated rules.
//!
//! A leading `!` inverts the match result of one rule. It does not invert the
//! verdict of the list: a negated rule that does not match simply lets the
//! next rule decide.

use filters::{FilterRule, FilterScope, Verdict};
use proptest::prelude::*;

// =============================================================================
// Basic Negation Tests
// =============================================================================

#[test]
fn negated_exclude_excludes_everything_else() {
    let scope = FilterScope::from_rules(["- !*.txt"]).unwrap();
    assert!(scope.exclude("./image.png", false));
    assert!(scope.include("./readme.txt", false));
}

#[test]
fn negated_include_includes_everything_else() {
    let scope = FilterScope::from_rules(["+ !*.rs", "- *"]).unwrap();
    assert!(scope.include("./config.toml", false));
    assert!(scope.exclude("./main.rs", false));
}

#[test]
fn negated_anchored_directory_rule() {
    let rule = FilterRule::parse("+ !/.svn/").unwrap();
    assert!(rule.is_negated());
    assert!(rule.is_anchored());
    assert!(rule.is_directory_only());
    assert_eq!(rule.matches("./.svn", true), Some(false));
    assert_eq!(rule.matches("./src", true), Some(true));
    assert_eq!(rule.matches("./file", false), None);
}

#[test]
fn negated_rule_falls_through_when_it_does_not_match() {
    let scope = FilterScope::from_rules(["- !*.log", "+ *"]).unwrap();
    assert_eq!(
        scope.check("./app.log", false, filters::DecisionContext::Transfer),
        Verdict::Included
    );
}

proptest! {
    /// Negation flips the raw match of exactly one rule.
    #[test]
    fn negation_inverts_single_rule(pattern in "[ab*?]{1,3}", name in "[ab]{1,3}") {
        let plain = FilterRule::parse(&format!("- {pattern}")).unwrap();
        let negated = FilterRule::parse(&format!("- !{pattern}")).unwrap();
        let candidate = format!("./{name}");

        let raw = plain.matches(&candidate, false).unwrap();
        prop_assert_eq!(negated.matches(&candidate, false), Some(!raw));
    }
}
