use super::*;
use std::sync::Arc;
use test_support::TestDir;

const MERGE_FILE: &str = ".rsyncMerge.filter";

fn list(lines: &[&str]) -> RuleList {
    lines
        .iter()
        .map(|line| FilterRule::parse(line).expect("rule parses"))
        .collect()
}

/// Directory holding a rule file with a comment, a blank line, `+ abc` and
/// `- def`.
fn merge_fixture() -> TestDir {
    let dir = TestDir::new().expect("create test dir");
    dir.write_file(MERGE_FILE, b"# rsync filter file\n\n+ abc\n- def\n")
        .expect("write merge file");
    dir
}

fn root_with(dir: &TestDir, lines: &[&str]) -> FilterScope {
    FilterScope::from_rules_in(dir.path(), lines).expect("rules parse")
}

// ============================================================================
// Rule list verdicts
// ============================================================================

#[test]
fn empty_list_is_neutral_for_files_and_directories() {
    let rules = RuleList::new();
    assert_eq!(rules.check("./dir1", true), Verdict::Neutral);
    assert_eq!(rules.check("./file1", false), Verdict::Neutral);
}

#[test]
fn anchored_file_before_anchored_star() {
    let rules = list(&["+ /dir1/file1", "- /dir1/*"]);
    assert_eq!(rules.check("./dir1/file1", false), Verdict::Included);
    assert_eq!(rules.check("./dir1/file2", false), Verdict::Excluded);
}

#[test]
fn anchored_star_includes_direct_children() {
    let rules = list(&["+ /dir1/*"]);
    assert_eq!(rules.check("./dir1/file2", false), Verdict::Included);
}

#[test]
fn anchored_double_star_reaches_nested_files() {
    let rules = list(&["+ /dir1/**"]);
    assert_eq!(rules.check("./dir1/dir2/file2", false), Verdict::Included);
}

#[test]
fn double_star_suffix_matches_any_depth() {
    let rules = list(&["+ **.txt"]);
    assert_eq!(rules.check("./dir1/dir2/file2.txt", false), Verdict::Included);
    assert_eq!(rules.check("./dir1/dir2/file2.dat", false), Verdict::Neutral);
}

#[test]
fn anchored_literal_covers_descendants() {
    let rules = list(&["+ /dir1"]);
    assert_eq!(rules.check("./dir1/dir2/file2", false), Verdict::Included);
}

#[test]
fn unanchored_literal_matches_tail() {
    let rules = list(&["+ file2"]);
    assert_eq!(rules.check("./dir1/dir2/file2", false), Verdict::Included);
}

#[test]
fn anchored_glob_with_directories() {
    let rules = list(&["+ /dir1/dir2/*.txt"]);
    assert_eq!(rules.check("./dir1/dir2/file2.txt", false), Verdict::Included);
}

#[test]
fn rule_order_decides_between_matching_rules() {
    let include_first = list(&["+ /dir1/file2", "- *"]);
    assert_eq!(include_first.check("./dir1/file1", false), Verdict::Excluded);
    assert_eq!(include_first.check("./dir1/file2", false), Verdict::Included);

    let exclude_first = list(&["- *", "+ /dir1/file2"]);
    assert_eq!(exclude_first.check("./dir1/file1", false), Verdict::Excluded);
    assert_eq!(exclude_first.check("./dir1/file2", false), Verdict::Excluded);
}

#[test]
fn star_rules_classify_the_root() {
    for is_dir in [false, true] {
        assert_eq!(list(&["+ *"]).check(".", is_dir), Verdict::Included);
        assert_eq!(list(&["- *"]).check(".", is_dir), Verdict::Excluded);
    }
}

// ============================================================================
// Scope configuration
// ============================================================================

#[test]
fn plain_include_rule() {
    let dir = merge_fixture();
    let scope = root_with(&dir, &["+ test"]);
    assert!(scope.include("test", false));
}

#[test]
fn dir_merge_with_missing_file_is_accepted() {
    let dir = merge_fixture();
    let scope = root_with(&dir, &["+ test", ":e .rsyncInclude-not-exists"]);
    assert!(scope.include("test", false));
    assert_eq!(scope.dir_merge_filename(), Some(".rsyncInclude-not-exists"));
}

#[test]
fn dir_merge_exclude_modifier_hides_the_rule_file() {
    let dir = merge_fixture();
    let scope = root_with(&dir, &["+ test", format!(":e {MERGE_FILE}").as_str()]);
    assert!(scope.include("test", false));
    assert!(!scope.include(MERGE_FILE, false));
}

#[test]
fn dir_merge_without_exclude_modifier_keeps_the_rule_file() {
    let dir = merge_fixture();
    let scope = root_with(&dir, &["+ test", "+ *", format!("dir-merge {MERGE_FILE}").as_str()]);
    assert!(scope.include("test", false));
    assert!(scope.include(MERGE_FILE, false));
}

#[test]
fn merge_reads_rules_and_hides_the_rule_file() {
    let dir = merge_fixture();
    let scope = root_with(&dir, &["+ test", format!(".e {MERGE_FILE}").as_str()]);
    assert!(scope.include("test", false));
    assert!(!scope.include(MERGE_FILE, false));
    assert!(scope.include("abc", false));
    assert!(!scope.include("def", false));
}

#[test]
fn merged_rules_are_inherited_by_children() {
    let dir = merge_fixture();
    let parent = Arc::new(root_with(&dir, &["+ test", format!("merge,e {MERGE_FILE}").as_str()]));
    let child = FilterScope::child(&parent, dir.path()).expect("child scope");

    assert!(child.include("test", false));
    assert!(!child.include(MERGE_FILE, false));
    assert!(child.include("abc", false));
    assert!(!child.include("def", false));
}

#[test]
fn non_inherited_dir_merge_applies_to_children_only() {
    let dir = merge_fixture();
    let parent = Arc::new(root_with(&dir, &["+ test", format!("dir-merge,n {MERGE_FILE}").as_str()]));
    let mut child = FilterScope::child(&parent, dir.path()).expect("child scope");
    child.read_rule("+ test").expect("rule");

    assert!(parent.include("test", false));
    assert!(parent.include("abc", false));
    assert!(parent.include("def", false));
    assert!(child.include(MERGE_FILE, false));
    assert!(child.include("test", false));
    assert!(child.include("abc", false));
    assert!(!child.include("def", false));
    assert!(!child.inherits());
}

#[test]
fn dir_merge_is_loaded_by_children() {
    let dir = merge_fixture();
    let parent = Arc::new(root_with(&dir, &["+ test", format!("dir-merge {MERGE_FILE}").as_str()]));
    let mut child = FilterScope::child(&parent, dir.path()).expect("child scope");
    child.read_rule("+ test").expect("rule");

    assert!(parent.include(MERGE_FILE, false));
    assert!(parent.include("def", false));
    assert!(child.include("abc", false));
    assert!(!child.include("def", false));
    assert!(child.inherits());
}

#[test]
fn parent_catch_all_reaches_children() {
    let dir = merge_fixture();
    let parent = Arc::new(root_with(&dir, &[format!("merge {MERGE_FILE}").as_str(), "+ *"]));
    let mut child = FilterScope::child(&parent, dir.path()).expect("child scope");
    child.read_rule("+ test").expect("rule");

    assert!(parent.include("test", false));
    assert!(!parent.include("def", false));
    assert!(child.include(MERGE_FILE, false));
    assert!(child.include("abc", false));
    assert!(child.include("ghi", false));
    assert!(!child.include("def", false));
}

#[test]
fn protect_and_risk_rules_in_child_scope() {
    let dir = merge_fixture();
    let parent = Arc::new(root_with(&dir, &[format!("merge {MERGE_FILE}").as_str(), "+ *"]));
    let mut child = FilterScope::child(&parent, dir.path()).expect("child scope");
    for line in ["+ test", "P test", "R test2"] {
        child.read_rule(line).expect("rule");
    }

    assert!(child.include("test", false));
    assert!(!child.include("def", false));
    assert!(child.protect("test", false));
    assert!(child.risk("test2", false));
    assert!(!child.protect("test2", false));
}

#[test]
fn filter_availability_follows_visible_scopes() {
    let dir = merge_fixture();
    assert!(!FilterScope::root(dir.path()).is_filter_available());

    let parent = Arc::new(root_with(&dir, &["P keep"]));
    let child = FilterScope::child(&parent, dir.path().join("sub")).expect("child scope");
    assert!(child.is_filter_available());
}
