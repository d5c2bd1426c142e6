use std::borrow::Cow;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::debug_filter::{
    trace_dir_merge_load, trace_filter_decision, trace_filter_list_cleared,
    trace_filter_rule_added, trace_merge_file,
};
use crate::modifiers::{MergeOptions, RuleDirective, RuleModifiers};
use crate::rule::split_rule_line;
use crate::{Classification, DecisionContext, FilterError, FilterRule, Polarity, RuleList, Verdict};

/// Per-directory filter state.
///
/// A scope owns two [`RuleList`]s (transfer and deletion), an optional link to
/// the scope of the enclosing directory, and the dir-merge declaration that
/// descendant scopes pick up automatically. Scopes form a tree that mirrors
/// the directory hierarchy being walked; children hold an [`Arc`] to their
/// parent and parents never track their children.
///
/// Local rules always take precedence over inherited ones. When no local rule
/// matches, ancestors are consulted from nearest to farthest, stopping at the
/// first scope that opted out of inheritance with the `n` modifier.
///
/// `n` makes the receiving scope a boundary: neither it nor its descendants
/// see any rule above it, while descendants still see the boundary's own
/// rules. It is not a per-link skip, under which the receiving scope would
/// keep consulting its ancestors and only its own rules would be hidden from
/// the scopes below.
///
/// # Examples
///
/// ```
/// use filters::FilterScope;
///
/// let scope = FilterScope::from_rules(["+ /dir1/file1", "- /dir1/*"]).unwrap();
/// assert!(scope.include("./dir1/file1", false));
/// assert!(scope.exclude("./dir1/file2", false));
/// assert!(scope.include("./elsewhere", false));
/// ```
#[derive(Clone, Debug)]
pub struct FilterScope {
    directory: PathBuf,
    parent: Option<Arc<FilterScope>>,
    rules: RuleList,
    deletion_rules: RuleList,
    inheritance_enabled: bool,
    inheritance_boundary: bool,
    dir_merge: Option<DirMergeDeclaration>,
    loaded_dir_merge: Option<usize>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct DirMergeDeclaration {
    filename: String,
    options: MergeOptions,
}

impl FilterScope {
    /// Creates an empty root scope for `directory`.
    #[must_use]
    pub fn root(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            parent: None,
            rules: RuleList::new(),
            deletion_rules: RuleList::new(),
            inheritance_enabled: true,
            inheritance_boundary: false,
            dir_merge: None,
            loaded_dir_merge: None,
        }
    }

    /// Creates a root scope for the current directory and reads every line.
    ///
    /// # Errors
    ///
    /// Fails on the first line that [`read_rule`](Self::read_rule) rejects.
    pub fn from_rules<I, S>(lines: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rules_in(".", lines)
    }

    /// Creates a root scope for `directory` and reads every line.
    ///
    /// Relative merge file names are resolved against `directory`.
    pub fn from_rules_in<I, S>(directory: impl Into<PathBuf>, lines: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Self::root(directory);
        for line in lines {
            scope.read_rule(line.as_ref())?;
        }
        Ok(scope)
    }

    /// Creates the scope for `directory`, a subdirectory of `parent`'s.
    ///
    /// The inheritance flag and dir-merge declaration are copied from the
    /// parent. When a dir-merge file name is known and `directory` contains a
    /// regular file of that name, its rules are read into the new scope with
    /// the declaration's modifiers. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Resource`] when the per-directory file exists
    /// but cannot be read, or a syntax error for a malformed line inside it.
    pub fn child(parent: &Arc<Self>, directory: impl Into<PathBuf>) -> Result<Self, FilterError> {
        let mut scope = Self {
            directory: directory.into(),
            parent: Some(Arc::clone(parent)),
            rules: RuleList::new(),
            deletion_rules: RuleList::new(),
            inheritance_enabled: parent.inheritance_enabled,
            inheritance_boundary: false,
            dir_merge: parent.dir_merge.clone(),
            loaded_dir_merge: None,
        };

        if let Some(declaration) = scope.dir_merge.clone() {
            scope
                .load_dir_merge(&declaration)
                .map_err(|error| error.in_directory(&scope.directory))?;
        }

        Ok(scope)
    }

    fn load_dir_merge(&mut self, declaration: &DirMergeDeclaration) -> Result<(), FilterError> {
        let path = resolve_dir_merge_path(&self.directory, Path::new(&declaration.filename));
        if !path.is_file() {
            return Ok(());
        }

        let options = declaration.options;
        if options.no_inherit {
            self.disable_inheritance();
        }
        let count = self.merge_file(&path, options.enforced, &mut Vec::new())?;
        if options.exclude_self {
            self.push_rule(FilterRule::exclude(&declaration.filename)?);
        }
        self.loaded_dir_merge = Some(count);
        trace_dir_merge_load(&self.directory, &declaration.filename, count);
        Ok(())
    }

    /// Reads one rule line into this scope.
    ///
    /// Besides ordinary rules the line may be a merge directive (read now),
    /// a dir-merge directive (remembered for descendants), or `!`/`clear`,
    /// which empties both lists, severs the parent link and forgets the
    /// dir-merge declaration.
    ///
    /// # Errors
    ///
    /// A malformed line is rejected without changing the scope. A merge file
    /// that cannot be read yields [`FilterError::Resource`]; lines read from
    /// it before a failure stay applied.
    pub fn read_rule(&mut self, line: &str) -> Result<(), FilterError> {
        self.read_rule_nested(line, &mut Vec::new())
            .map_err(|error| error.in_directory(&self.directory))
    }

    fn read_rule_nested(&mut self, line: &str, merging: &mut Vec<PathBuf>) -> Result<(), FilterError> {
        let line = line.trim();
        if line == "!" || line.starts_with("clear") {
            self.clear();
            return Ok(());
        }

        let (token, expression) = split_rule_line(line)?;
        match RuleModifiers::parse(token, line)?.directive() {
            RuleDirective::Rule {
                polarity,
                classification,
            } => {
                let rule = FilterRule::build(polarity, classification, expression, line)?;
                self.push_rule(rule);
            }
            RuleDirective::Merge(options) => {
                if options.no_inherit {
                    self.disable_inheritance();
                }
                self.merge_with(Path::new(expression), options, merging)?;
            }
            RuleDirective::DirMerge(options) => {
                if options.no_inherit {
                    self.disable_inheritance();
                }
                self.declare_dir_merge(expression, options)?;
            }
        }
        Ok(())
    }

    /// Reads the rule file `file` into this scope, as `merge` would.
    ///
    /// Unlike going through [`read_rule`](Self::read_rule), the file name may
    /// contain whitespace.
    pub fn merge(&mut self, file: &Path, options: MergeOptions) -> Result<(), FilterError> {
        if options.no_inherit {
            self.disable_inheritance();
        }
        self.merge_with(file, options, &mut Vec::new())
            .map_err(|error| error.in_directory(&self.directory))
    }

    fn merge_with(
        &mut self,
        file: &Path,
        options: MergeOptions,
        merging: &mut Vec<PathBuf>,
    ) -> Result<(), FilterError> {
        let path = self.resolve(file);
        let count = self.merge_file(&path, options.enforced, merging)?;
        trace_merge_file(&self.directory, &path, count);

        if options.exclude_self {
            let name = file.to_string_lossy();
            self.push_rule(FilterRule::exclude(&name)?);
        }
        Ok(())
    }

    /// Reads `path` line by line and returns how many rules it contributed.
    fn merge_file(
        &mut self,
        path: &Path,
        enforced: Option<Polarity>,
        merging: &mut Vec<PathBuf>,
    ) -> Result<usize, FilterError> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if merging.contains(&canonical) {
            return Err(FilterError::RecursiveMerge {
                path: path.to_path_buf(),
            });
        }

        let file = fs::File::open(path)
            .map_err(|error| FilterError::resource(path, &self.directory, error))?;

        let before = self.rule_count();
        merging.push(canonical);
        let result = self.ingest(BufReader::new(file), path, enforced, merging);
        merging.pop();
        result?;

        Ok(self.rule_count().saturating_sub(before))
    }

    fn ingest(
        &mut self,
        reader: impl BufRead,
        path: &Path,
        enforced: Option<Polarity>,
        merging: &mut Vec<PathBuf>,
    ) -> Result<(), FilterError> {
        for line in reader.lines() {
            let line = line.map_err(|error| FilterError::resource(path, &self.directory, error))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match enforced {
                Some(polarity) => {
                    let rule = FilterRule::build(polarity, Classification::Ordinary, line, line)?;
                    self.push_rule(rule);
                }
                None => self.read_rule_nested(line, merging)?,
            }
        }
        Ok(())
    }

    fn declare_dir_merge(&mut self, filename: &str, options: MergeOptions) -> Result<(), FilterError> {
        if self.dir_merge.is_none() {
            self.dir_merge = Some(DirMergeDeclaration {
                filename: filename.to_owned(),
                options,
            });
        }

        if options.exclude_self {
            if let Some(known) = self.dir_merge_filename() {
                let rule = FilterRule::exclude(known)?;
                self.push_rule(rule);
            }
        }
        Ok(())
    }

    /// Appends an already built rule to the list its classification selects.
    ///
    /// Useful for patterns that contain whitespace and therefore cannot be
    /// written as a rule line.
    pub fn add_rule(&mut self, rule: FilterRule) {
        self.push_rule(rule);
    }

    fn push_rule(&mut self, rule: FilterRule) {
        let context = if rule.classification().is_deletion_class() {
            DecisionContext::Deletion
        } else {
            DecisionContext::Transfer
        };
        trace_filter_rule_added(&self.directory, &rule, context);
        match context {
            DecisionContext::Transfer => self.rules.push(rule),
            DecisionContext::Deletion => self.deletion_rules.push(rule),
        }
    }

    fn clear(&mut self) {
        self.rules.clear();
        self.deletion_rules.clear();
        self.parent = None;
        self.dir_merge = None;
        trace_filter_list_cleared(&self.directory);
    }

    fn disable_inheritance(&mut self) {
        self.inheritance_enabled = false;
        self.inheritance_boundary = true;
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.directory.join(file)
        }
    }

    fn rule_count(&self) -> usize {
        self.rules.len() + self.deletion_rules.len()
    }

    const fn list(&self, context: DecisionContext) -> &RuleList {
        match context {
            DecisionContext::Transfer => &self.rules,
            DecisionContext::Deletion => &self.deletion_rules,
        }
    }

    /// The parent whose rules this scope may inherit.
    fn inherited_parent(&self) -> Option<&Self> {
        if self.inheritance_boundary {
            None
        } else {
            self.parent.as_deref()
        }
    }

    /// Iterates over this scope and every ancestor whose rules it can see,
    /// nearest first.
    pub fn visible_scopes(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |scope| scope.inherited_parent())
    }

    /// Classifies `candidate` (a path of the form `./dir/file`).
    ///
    /// Directories are matched with a trailing `/`. The local list for
    /// `context` is consulted first; ancestors are only asked when it is
    /// neutral. The chain is climbed once.
    #[must_use]
    pub fn check(&self, candidate: &str, is_dir: bool, context: DecisionContext) -> Verdict {
        let verdict = self
            .decisive_rule(candidate, is_dir, context)
            .map_or(Verdict::Neutral, |rule| Verdict::from(rule.polarity()));
        trace_filter_decision(candidate, context, verdict);
        verdict
    }

    /// Returns the rule that decides [`check`](Self::check), or `None` when
    /// the verdict is neutral.
    #[must_use]
    pub fn decisive_rule(
        &self,
        candidate: &str,
        is_dir: bool,
        context: DecisionContext,
    ) -> Option<&FilterRule> {
        let subject = directory_subject(candidate, is_dir);
        self.visible_scopes()
            .find_map(|scope| scope.list(context).first_match(&subject, is_dir))
    }

    /// Returns `true` unless the transfer verdict is [`Verdict::Excluded`].
    #[must_use]
    pub fn include(&self, candidate: &str, is_dir: bool) -> bool {
        !self.exclude(candidate, is_dir)
    }

    /// Returns `true` when the transfer verdict is [`Verdict::Excluded`].
    #[must_use]
    pub fn exclude(&self, candidate: &str, is_dir: bool) -> bool {
        self.check(candidate, is_dir, DecisionContext::Transfer) == Verdict::Excluded
    }

    /// Returns `true` when a protect rule keeps `candidate` from deletion.
    #[must_use]
    pub fn protect(&self, candidate: &str, is_dir: bool) -> bool {
        self.check(candidate, is_dir, DecisionContext::Deletion) == Verdict::Excluded
    }

    /// Returns `true` unless a protect rule applies; a neutral verdict counts
    /// as risk.
    #[must_use]
    pub fn risk(&self, candidate: &str, is_dir: bool) -> bool {
        !self.protect(candidate, is_dir)
    }

    /// Returns whether any visible scope owns at least one rule.
    ///
    /// Callers may skip filtering for a subtree when this is `false`; the
    /// verdicts of [`check`](Self::check) are the same either way.
    #[must_use]
    pub fn is_filter_available(&self) -> bool {
        self.visible_scopes()
            .any(|scope| !scope.rules.is_empty() || !scope.deletion_rules.is_empty())
    }

    /// Directory this scope belongs to.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scope of the enclosing directory, unless severed by a clear.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Local transfer rules.
    #[must_use]
    pub const fn rules(&self) -> &RuleList {
        &self.rules
    }

    /// Local protect/risk rules.
    #[must_use]
    pub const fn deletion_rules(&self) -> &RuleList {
        &self.deletion_rules
    }

    /// Name of the per-directory rule file descendants will load.
    #[must_use]
    pub fn dir_merge_filename(&self) -> Option<&str> {
        self.dir_merge
            .as_ref()
            .map(|declaration| declaration.filename.as_str())
    }

    /// Number of rules read from this directory's own per-directory file, or
    /// `None` when no such file was loaded while the scope was created.
    #[must_use]
    pub const fn loaded_dir_merge(&self) -> Option<usize> {
        self.loaded_dir_merge
    }

    /// Modifiers recorded with the dir-merge declaration.
    #[must_use]
    pub fn dir_merge_options(&self) -> Option<MergeOptions> {
        self.dir_merge.as_ref().map(|declaration| declaration.options)
    }

    /// `false` once this scope or one of the ancestors it was created from
    /// received an `n` modifier.
    #[must_use]
    pub const fn inherits(&self) -> bool {
        self.inheritance_enabled
    }

    /// Recursive formulation of [`check`](Self::check): every visible
    /// ancestor runs its own full climb. Quadratic in depth.
    #[cfg(test)]
    pub(crate) fn check_recursive(
        &self,
        candidate: &str,
        is_dir: bool,
        context: DecisionContext,
    ) -> Verdict {
        let subject = directory_subject(candidate, is_dir);
        self.recursive_verdict(&subject, is_dir, context)
    }

    #[cfg(test)]
    fn recursive_verdict(&self, subject: &str, is_dir: bool, context: DecisionContext) -> Verdict {
        let local = self.list(context).check(subject, is_dir);
        if !local.is_neutral() {
            return local;
        }

        let mut ancestor = self.inherited_parent();
        while let Some(scope) = ancestor {
            let verdict = scope.recursive_verdict(subject, is_dir, context);
            if !verdict.is_neutral() {
                return verdict;
            }
            ancestor = scope.inherited_parent();
        }
        Verdict::Neutral
    }
}

fn directory_subject(candidate: &str, is_dir: bool) -> Cow<'_, str> {
    if is_dir && !candidate.ends_with('/') {
        Cow::Owned(format!("{candidate}/"))
    } else {
        Cow::Borrowed(candidate)
    }
}

/// Joins a dir-merge file name onto `base`, treating an absolute name as
/// relative to `base`.
pub(crate) fn resolve_dir_merge_path(base: &Path, name: &Path) -> PathBuf {
    if name.is_absolute() {
        if let Ok(stripped) = name.strip_prefix(Path::new("/")) {
            return base.join(stripped);
        }
    }
    base.join(name)
}
