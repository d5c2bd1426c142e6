//! Tests for per-directory merge files (`:` / `dir-merge`).
//!
//! Declaring a dir-merge file name records it in the scope. Every child scope
//! created afterwards copies the declaration and reads the file from its own
//! directory when one exists.

use filters::{FilterScope, MergeOptions, Polarity};
use std::sync::Arc;
use test_support::{FileTree, TestDir};

fn tree() -> TestDir {
    let dir = TestDir::new().unwrap();
    FileTree::new()
        .rules_file("a/.rules", &["- *.o", "+ keep.o"])
        .rules_file("a/b/.rules", &["+ *.o"])
        .rules_file("c/.rules", &["*.log", "*.tmp"])
        .dir("d")
        .create_in(&dir)
        .unwrap();
    dir
}

fn child(parent: &FilterScope, dir: &TestDir, relative: &str) -> FilterScope {
    FilterScope::child(&Arc::new(parent.clone()), dir.join(relative)).unwrap()
}

#[test]
fn declaration_is_recorded_but_not_loaded_for_the_declaring_scope() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.join("a"), [": .rules"]).unwrap();
    assert_eq!(root.dir_merge_filename(), Some(".rules"));
    assert!(root.include("./x.o", false));
    assert!(!root.is_filter_available());
}

#[test]
fn child_loads_file_from_its_directory() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), ["dir-merge .rules"]).unwrap();
    let a = child(&root, &dir, "a");

    assert_eq!(a.rules().len(), 2);
    assert_eq!(a.loaded_dir_merge(), Some(2));
    assert!(a.exclude("./a/x.o", false));
    assert!(a.exclude("./a/keep.o", false));
}

#[test]
fn grandchild_rules_take_precedence() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), [": .rules"]).unwrap();
    let a = Arc::new(FilterScope::child(&Arc::new(root), dir.join("a")).unwrap());
    let b = FilterScope::child(&a, dir.join("a/b")).unwrap();

    assert!(b.include("./a/b/x.o", false));
    assert!(a.exclude("./a/x.o", false));
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), [": .rules"]).unwrap();
    let d = child(&root, &dir, "d");
    assert!(!d.is_filter_available());
    assert_eq!(d.loaded_dir_merge(), None);
    assert_eq!(d.dir_merge_filename(), Some(".rules"));
}

#[test]
fn first_declaration_wins() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), [": .rules", ": .other"]).unwrap();
    assert_eq!(root.dir_merge_filename(), Some(".rules"));
}

#[test]
fn enforced_polarity_applies_to_every_line() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), [":- .rules"]).unwrap();
    assert_eq!(
        root.dir_merge_options(),
        Some(MergeOptions {
            enforced: Some(Polarity::Exclude),
            exclude_self: false,
            no_inherit: false,
        })
    );

    let c = child(&root, &dir, "c");
    assert!(c.exclude("./c/app.log", false));
    assert!(c.exclude("./c/scratch.tmp", false));
    assert!(c.include("./c/app.txt", false));
}

#[test]
fn exclude_modifier_hides_the_file_in_every_directory() {
    let dir = tree();
    let root = Arc::new(FilterScope::from_rules_in(dir.path(), [":e .rules"]).unwrap());
    assert!(root.exclude("./.rules", false));

    let a = FilterScope::child(&root, dir.join("a")).unwrap();
    assert!(a.exclude("./a/.rules", false));
}

#[test]
fn no_inherit_modifier_isolates_loading_scope() {
    let dir = tree();
    let root = Arc::new(
        FilterScope::from_rules_in(dir.path(), ["- *.txt", ":n .rules"]).unwrap(),
    );
    assert!(!root.inherits());

    let a = FilterScope::child(&root, dir.join("a")).unwrap();
    assert!(a.exclude("./a/x.o", false));
    assert!(a.include("./a/notes.txt", false));

    let d = FilterScope::child(&root, dir.join("d")).unwrap();
    assert!(d.exclude("./d/notes.txt", false));
}

#[test]
fn directory_named_like_the_rule_file_is_skipped() {
    let dir = tree();
    dir.mkdir("e/.rules").unwrap();
    let root = Arc::new(FilterScope::from_rules_in(dir.path(), [": .rules"]).unwrap());
    let e = FilterScope::child(&root, dir.join("e")).unwrap();
    assert_eq!(e.loaded_dir_merge(), None);
}

#[test]
fn absolute_name_is_loaded_from_each_directory() {
    let dir = tree();
    let root = FilterScope::from_rules_in(dir.path(), [": /.rules"]).unwrap();
    assert_eq!(root.loaded_dir_merge(), None);

    let a = child(&root, &dir, "a");
    assert_eq!(a.loaded_dir_merge(), Some(2));
    assert!(a.exclude("./a/x.o", false));
    assert_eq!(child(&root, &dir, "d").loaded_dir_merge(), None);
}

#[test]
fn syntax_error_in_dir_merge_file_names_the_directory() {
    let dir = tree();
    dir.write_rules("f/.rules", &["~ bogus"]).unwrap();
    let root = Arc::new(FilterScope::from_rules_in(dir.path(), [": .rules"]).unwrap());

    let error = FilterScope::child(&root, dir.join("f")).unwrap_err();
    let text = error.to_string();
    assert!(text.contains("unknown modifier '~'"), "{text}");
    assert!(text.contains(&dir.join("f").display().to_string()), "{text}");
}
