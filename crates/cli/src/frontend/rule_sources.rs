//! Rule arguments gathered from the command line in the order they were given.
//!
//! clap groups values per option, which loses the interleaving between
//! `--include`, `--exclude`, `--filter` and friends. Since the first matching
//! rule wins, the raw argument vector is scanned once more to recover the
//! order, and the per-option value lists are consumed in that order.

use std::ffi::OsString;
use std::path::{self, PathBuf};

use clap::ArgMatches;
use filters::{FilterError, FilterRule, FilterScope, MergeOptions, Polarity};

/// Per-directory rule file enabled by `-F`.
pub(crate) const RSYNC_FILTER_FILE: &str = ".rsync-filter";

/// Long options that take a value but contribute no rules.
const OTHER_VALUE_OPTIONS: &[&str] = &["info", "debug"];

/// One rule-producing command-line argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum RuleSource {
    /// `-f` / `--filter RULE`.
    Filter(String),
    /// `--include PATTERN`.
    Include(String),
    /// `--exclude PATTERN`.
    Exclude(String),
    /// `--include-from FILE`, already made absolute.
    IncludeFrom(PathBuf),
    /// `--exclude-from FILE`, already made absolute.
    ExcludeFrom(PathBuf),
    /// The n-th `-F`, counting from zero.
    RsyncFilter(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SourceKind {
    Filter,
    Include,
    Exclude,
    IncludeFrom,
    ExcludeFrom,
    RsyncFilter,
}

impl SourceKind {
    fn from_long(name: &str) -> Option<Self> {
        match name {
            "filter" => Some(Self::Filter),
            "include" => Some(Self::Include),
            "exclude" => Some(Self::Exclude),
            "include-from" => Some(Self::IncludeFrom),
            "exclude-from" => Some(Self::ExcludeFrom),
            _ => None,
        }
    }
}

/// Records the kind of every rule argument in argv order.
fn locate_rule_arguments(args: &[OsString]) -> Vec<SourceKind> {
    let mut kinds = Vec::new();
    let mut expect_value = false;

    for arg in args.iter().skip(1) {
        if expect_value {
            expect_value = false;
            continue;
        }

        let text = arg.to_string_lossy();
        if text == "--" {
            break;
        }

        if let Some(long) = text.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            if let Some(kind) = SourceKind::from_long(name) {
                kinds.push(kind);
                expect_value = !inline_value;
            } else if OTHER_VALUE_OPTIONS.contains(&name) {
                expect_value = !inline_value;
            }
            continue;
        }

        if let Some(cluster) = text.strip_prefix('-') {
            for (offset, ch) in cluster.char_indices() {
                match ch {
                    'F' => kinds.push(SourceKind::RsyncFilter),
                    'f' => {
                        kinds.push(SourceKind::Filter);
                        // the rest of the cluster is the rule itself
                        expect_value = offset + ch.len_utf8() == cluster.len();
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    kinds
}

fn values<T>(matches: &ArgMatches, id: &str) -> std::vec::IntoIter<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .get_many::<T>(id)
        .map(|values| values.cloned().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
}

fn absolute(path: PathBuf) -> PathBuf {
    path::absolute(&path).unwrap_or(path)
}

/// Interleaves the parsed option values in command-line order.
pub(crate) fn collect_rule_sources(args: &[OsString], matches: &ArgMatches) -> Vec<RuleSource> {
    let mut filters = values::<String>(matches, "filter");
    let mut includes = values::<String>(matches, "include");
    let mut excludes = values::<String>(matches, "exclude");
    let mut include_files = values::<PathBuf>(matches, "include-from");
    let mut exclude_files = values::<PathBuf>(matches, "exclude-from");
    let mut rsync_filters = 0..usize::from(matches.get_count("rsync-filter"));

    locate_rule_arguments(args)
        .into_iter()
        .filter_map(|kind| match kind {
            SourceKind::Filter => filters.next().map(RuleSource::Filter),
            SourceKind::Include => includes.next().map(RuleSource::Include),
            SourceKind::Exclude => excludes.next().map(RuleSource::Exclude),
            SourceKind::IncludeFrom => include_files.next().map(|path| RuleSource::IncludeFrom(absolute(path))),
            SourceKind::ExcludeFrom => exclude_files.next().map(|path| RuleSource::ExcludeFrom(absolute(path))),
            SourceKind::RsyncFilter => rsync_filters.next().map(RuleSource::RsyncFilter),
        })
        .collect()
}

fn enforced(polarity: Polarity) -> MergeOptions {
    MergeOptions {
        enforced: Some(polarity),
        ..MergeOptions::default()
    }
}

/// Feeds every source into `scope`, stopping at the first failure.
pub(crate) fn apply_rule_sources(
    scope: &mut FilterScope,
    sources: &[RuleSource],
) -> Result<(), FilterError> {
    for source in sources {
        match source {
            RuleSource::Filter(line) => scope.read_rule(line)?,
            RuleSource::Include(pattern) => scope.add_rule(FilterRule::include(pattern)?),
            RuleSource::Exclude(pattern) => scope.add_rule(FilterRule::exclude(pattern)?),
            RuleSource::IncludeFrom(path) => scope.merge(path, enforced(Polarity::Include))?,
            RuleSource::ExcludeFrom(path) => scope.merge(path, enforced(Polarity::Exclude))?,
            RuleSource::RsyncFilter(0) => {
                scope.read_rule(&format!("dir-merge /{RSYNC_FILTER_FILE}"))?;
            }
            RuleSource::RsyncFilter(1) => scope.add_rule(FilterRule::exclude(RSYNC_FILTER_FILE)?),
            RuleSource::RsyncFilter(_) => {}
        }
    }
    Ok(())
}
