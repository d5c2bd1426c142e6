//! Tests for anchored (leading `/`) and directory-only (trailing `/`) rules.
//!
//! Anchored expressions are matched from the scope root, which candidates
//! spell as a leading `./`. Anchored literals also match everything below
//! the named path, unless they are directory-only: `/build/` names the
//! `build` directory and nothing inside it.

use filters::{DecisionContext, FilterRule, FilterScope, Verdict};
use proptest::prelude::*;

// =============================================================================
// Anchoring
// =============================================================================

#[test]
fn anchored_rule_matches_only_at_root() {
    let scope = FilterScope::from_rules(["- /foo/bar"]).unwrap();
    assert!(scope.exclude("./foo/bar", false));
    assert!(scope.include("./a/foo/bar", false));
}

#[test]
fn unanchored_rule_matches_at_any_depth() {
    let scope = FilterScope::from_rules(["- foo/bar"]).unwrap();
    assert!(scope.exclude("./foo/bar", false));
    assert!(scope.exclude("./a/foo/bar", false));
    assert!(scope.include("./a/xfoo/bar", false));
}

#[test]
fn anchored_literal_covers_subtree_on_component_boundary() {
    let scope = FilterScope::from_rules(["+ /dir1", "- *"]).unwrap();
    assert!(scope.include("./dir1", true));
    assert!(scope.include("./dir1/dir2/file2", false));
    assert!(scope.exclude("./dir10", false));
}

#[test]
fn anchored_flag_and_pattern() {
    let rule = FilterRule::parse("- /build").unwrap();
    assert!(rule.is_anchored());
    assert_eq!(rule.pattern(), "build");
    assert_eq!(rule.to_string(), "- /build");
}

// =============================================================================
// Directory-Only Rules
// =============================================================================

#[test]
fn directory_only_rule_ignores_files() {
    let scope = FilterScope::from_rules(["- cache/"]).unwrap();
    assert!(scope.exclude("./cache", true));
    assert!(scope.exclude("./deep/cache", true));
    assert!(scope.include("./cache", false));
}

#[test]
fn anchored_directory_only_rule() {
    let scope = FilterScope::from_rules(["- /target/"]).unwrap();
    assert!(scope.exclude("./target", true));
    assert!(scope.include("./sub/target", true));
    assert!(scope.include("./target", false));
}

#[test]
fn directory_candidates_may_already_end_with_slash() {
    let scope = FilterScope::from_rules(["- /target/"]).unwrap();
    assert!(scope.exclude("./target/", true));
}

#[test]
fn anchored_directory_rule_does_not_reach_nested_directories() {
    let rule = FilterRule::parse("+ /build/").unwrap();
    assert_eq!(rule.matches("./build", true), Some(true));
    assert_eq!(rule.matches("./build/nested", true), Some(false));

    let scope = FilterScope::from_rules(["+ /build/", "- *"]).unwrap();
    assert_eq!(
        scope.check("./build", true, DecisionContext::Transfer),
        Verdict::Included
    );
    assert_eq!(
        scope.check("./build/nested", true, DecisionContext::Transfer),
        Verdict::Excluded
    );
    assert_eq!(
        scope.check("./build/out.o", false, DecisionContext::Transfer),
        Verdict::Excluded
    );
}

#[test]
fn plain_rule_applies_to_directories_too() {
    let scope = FilterScope::from_rules(["- node_modules"]).unwrap();
    assert!(scope.exclude("./web/node_modules", true));
    assert!(scope.exclude("./web/node_modules", false));
}

proptest! {
    /// A directory-only rule never decides the verdict for a non-directory.
    #[test]
    fn directory_only_rules_never_affect_files(
        pattern in "[a-c*?]{1,4}",
        anchored in any::<bool>(),
        name in "[a-c]{1,4}",
    ) {
        let anchor = if anchored { "/" } else { "" };
        let rule = FilterRule::parse(&format!("- {anchor}{pattern}/")).unwrap();
        prop_assert_eq!(rule.matches(&format!("./{name}"), false), None);

        let scope = FilterScope::from_rules([format!("- {anchor}{pattern}/")]).unwrap();
        let path = format!("./{name}");
        prop_assert!(scope.include(&path, false));
    }
}
