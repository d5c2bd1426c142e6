//! Depth-first walk that classifies every entry below the root directory.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use filters::debug_filter::FilterTracer;
use filters::{DecisionContext, FilterError, FilterScope, Polarity, Verdict};
use logging::{DebugFlag, DiagnosticEvent, debug_gte, debug_log, drain_events, info_log};

use super::PROGRAM_NAME;

/// Failure that aborts the walk.
#[derive(Debug)]
pub(crate) enum WalkError {
    /// A per-directory rule file could not be loaded.
    Filter(FilterError),
    /// Writing the listing failed.
    Output(io::Error),
}

impl From<io::Error> for WalkError {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

/// Counters reported once the walk finished.
#[derive(Debug, Default)]
pub(crate) struct WalkSummary {
    pub(crate) tracer: FilterTracer,
    /// Directories or entries that could not be read.
    pub(crate) io_errors: usize,
}

pub(crate) struct Walker<'a, Out, Err> {
    stdout: &'a mut Out,
    stderr: &'a mut Err,
    delete: bool,
    summary: WalkSummary,
}

impl<'a, Out, Err> Walker<'a, Out, Err>
where
    Out: Write,
    Err: Write,
{
    pub(crate) fn new(stdout: &'a mut Out, stderr: &'a mut Err, delete: bool) -> Self {
        Self {
            stdout,
            stderr,
            delete,
            summary: WalkSummary::default(),
        }
    }

    /// Walks `root`, whose command-line rules live in `root_scope`.
    ///
    /// The top directory gets a child scope of its own so a dir-merge file
    /// declared on the command line is also read from `root` itself.
    pub(crate) fn run(mut self, root_scope: FilterScope, root: &Path) -> Result<WalkSummary, WalkError> {
        let command_line_rules = root_scope.rules().len() + root_scope.deletion_rules().len();
        for _ in 0..command_line_rules {
            self.summary.tracer.record_rule_added();
        }

        let top = self.enter(&Arc::new(root_scope), root)?;
        self.walk_directory(&top, root, ".")?;
        self.flush_events()?;
        Ok(self.summary)
    }

    fn enter(&mut self, parent: &Arc<FilterScope>, directory: &Path) -> Result<Arc<FilterScope>, WalkError> {
        let scope = FilterScope::child(parent, directory).map_err(WalkError::Filter)?;
        if let Some(count) = scope.loaded_dir_merge() {
            self.summary.tracer.record_dir_merge(count);
        }
        Ok(Arc::new(scope))
    }

    fn walk_directory(
        &mut self,
        scope: &Arc<FilterScope>,
        directory: &Path,
        relative: &str,
    ) -> Result<(), WalkError> {
        tracing::debug!(
            target: "rsync::walk",
            directory = relative,
            local_rules = scope.rules().len(),
            "entering directory"
        );

        let entries = match sorted_entries(directory) {
            Ok(entries) => entries,
            Err(error) => {
                self.report_io_error(directory, &error)?;
                return Ok(());
            }
        };

        for entry in entries {
            let name = entry.file_name();
            let candidate = format!("{relative}/{}", name.to_string_lossy());
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(error) => {
                    self.report_io_error(&entry.path(), &error)?;
                    continue;
                }
            };

            let verdict = scope.check(&candidate, is_dir, DecisionContext::Transfer);
            self.summary.tracer.record_evaluation(verdict);
            explain(scope, &candidate, is_dir);
            self.print_entry(scope, &candidate, is_dir, verdict)?;

            if !is_dir {
                continue;
            }
            if verdict == Verdict::Excluded {
                info_log!(Skip, 1, "skipping excluded directory {candidate}/");
                self.flush_events()?;
                continue;
            }

            let path = entry.path();
            let child = self.enter(scope, &path)?;
            self.walk_directory(&child, &path, &candidate)?;
        }
        Ok(())
    }

    fn print_entry(
        &mut self,
        scope: &FilterScope,
        candidate: &str,
        is_dir: bool,
        verdict: Verdict,
    ) -> Result<(), WalkError> {
        let transfer = if verdict == Verdict::Excluded { '-' } else { '+' };
        let suffix = if is_dir { "/" } else { "" };

        if self.delete {
            let protected = scope.protect(candidate, is_dir);
            let deletion = if protected { 'P' } else { 'R' };
            writeln!(self.stdout, "{transfer} {deletion} {candidate}{suffix}")?;
            if protected {
                info_log!(Del, 1, "protecting {candidate}{suffix} from deletion");
            }
        } else {
            writeln!(self.stdout, "{transfer} {candidate}{suffix}")?;
        }

        if !scope.is_filter_available() {
            info_log!(Name, 2, "{candidate}{suffix}: no filter rules in effect");
        }
        self.flush_events()
    }

    fn report_io_error(&mut self, path: &Path, error: &io::Error) -> Result<(), WalkError> {
        self.summary.io_errors += 1;
        writeln!(
            self.stderr,
            "{PROGRAM_NAME}: failed to read '{}': {error}",
            path.display()
        )?;
        Ok(())
    }

    /// Info events go to stdout next to the listing, debug events to stderr.
    fn flush_events(&mut self) -> Result<(), WalkError> {
        for event in drain_events() {
            match event {
                DiagnosticEvent::Info { .. } => writeln!(self.stdout, "{event}")?,
                DiagnosticEvent::Debug { .. } => writeln!(self.stderr, "{event}")?,
            }
        }
        Ok(())
    }
}

/// Reports which rule decided an entry at `--debug=filter`.
fn explain(scope: &FilterScope, candidate: &str, is_dir: bool) {
    if !debug_gte(DebugFlag::Filter, 1) {
        return;
    }
    let Some(rule) = scope.decisive_rule(candidate, is_dir, DecisionContext::Transfer) else {
        return;
    };
    let action = match rule.polarity() {
        Polarity::Include => "including",
        Polarity::Exclude => "excluding",
    };
    let kind = if is_dir { "directory" } else { "file" };
    debug_log!(Filter, 1, "{action} {kind} {candidate} because of rule '{rule}'");
}

fn sorted_entries(directory: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(directory)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);
    Ok(entries)
}
