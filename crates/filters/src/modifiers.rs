//! Parsing of the prefix token that precedes a rule's path expression.
//!
//! The token is read character by character. Punctuation and single letters
//! combine freely (`:e`, `.en`, `-`), long keywords may appear in place of
//! their short forms (`dir-merge,n`, `merge,e`, `protect`), and `,`
//! separates modifiers. See the MERGE-FILE FILTER RULES section of rsync(1).

use crate::rule::RULE_FORMAT_HINT;
use crate::{Classification, FilterError, Polarity};

/// Long keywords accepted in place of single-character prefixes.
///
/// Longer words come first so `dir-merge` is never read as `d` + `ir-merge`.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("dir-merge", Keyword::DirMerge),
    ("exclude", Keyword::Exclude),
    ("include", Keyword::Include),
    ("protect", Keyword::Protect),
    ("merge", Keyword::Merge),
    ("risk", Keyword::Risk),
    ("hide", Keyword::Protect),
    ("show", Keyword::Risk),
];

#[derive(Clone, Copy, Debug)]
enum Keyword {
    Include,
    Exclude,
    Merge,
    DirMerge,
    Protect,
    Risk,
}

/// Structured form of a rule's prefix token.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RuleModifiers {
    include: bool,
    exclude: bool,
    merge: bool,
    dir_merge: bool,
    exclude_merge_filename: bool,
    no_inherit: bool,
    protect: bool,
    risk: bool,
}

/// What a rule line asks the owning scope to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleDirective {
    /// Append a rule to one of the scope's rule lists.
    Rule {
        /// Include or exclude.
        polarity: Polarity,
        /// Ordinary, protect or risk.
        classification: Classification,
    },
    /// Read another rule file now (`.` / `merge`).
    Merge(MergeOptions),
    /// Read a rule file in every descendant directory (`:` / `dir-merge`).
    DirMerge(MergeOptions),
}

/// Modifiers carried by a merge or dir-merge directive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MergeOptions {
    /// Every line of the file becomes a rule of this polarity (`+` / `-`).
    pub enforced: Option<Polarity>,
    /// Exclude the merge file itself from the transfer (`e`).
    pub exclude_self: bool,
    /// Stop inheriting rules from enclosing scopes (`n`).
    pub no_inherit: bool,
}

impl RuleModifiers {
    /// Parses `token`, the first whitespace-separated field of `rule`.
    ///
    /// `rule` is only used to build error messages. The returned value has
    /// already been validated against contradictory combinations.
    pub fn parse(token: &str, rule: &str) -> Result<Self, FilterError> {
        let mut modifiers = Self::default();
        let mut rest = token;

        while let Some(ch) = rest.chars().next() {
            if modifiers.is_merge() {
                match ch {
                    'e' => {
                        modifiers.exclude_merge_filename = true;
                        rest = &rest[1..];
                        continue;
                    }
                    'n' => {
                        modifiers.no_inherit = true;
                        rest = &rest[1..];
                        continue;
                    }
                    'w' => {
                        return Err(FilterError::syntax(
                            rule,
                            "the modifier 'w' is not implemented",
                        ));
                    }
                    _ => {}
                }
            }

            if let Some((word, keyword)) = KEYWORDS
                .iter()
                .find(|(word, _)| rest.starts_with(word))
                .copied()
            {
                modifiers.apply(keyword);
                rest = &rest[word.len()..];
                continue;
            }

            match ch {
                '+' => modifiers.include = true,
                '-' => modifiers.exclude = true,
                '.' => modifiers.merge = true,
                ':' => modifiers.dir_merge = true,
                'P' | 'H' => modifiers.protect = true,
                'R' | 'S' => modifiers.risk = true,
                ',' => {}
                'e' | 'n' | 'w' => {
                    return Err(FilterError::syntax(
                        rule,
                        format!("modifier '{ch}' is only valid after merge or dir-merge"),
                    ));
                }
                other => {
                    return Err(FilterError::syntax(
                        rule,
                        format!("unknown modifier '{other}'"),
                    ));
                }
            }
            rest = &rest[ch.len_utf8()..];
        }

        modifiers.validate(rule)?;
        Ok(modifiers)
    }

    fn apply(&mut self, keyword: Keyword) {
        match keyword {
            Keyword::Include => self.include = true,
            Keyword::Exclude => self.exclude = true,
            Keyword::Merge => self.merge = true,
            Keyword::DirMerge => self.dir_merge = true,
            Keyword::Protect => self.protect = true,
            Keyword::Risk => self.risk = true,
        }
    }

    fn validate(&self, rule: &str) -> Result<(), FilterError> {
        let deletion_class = self.protect || self.risk;
        let contradictory = (self.merge && self.dir_merge)
            || (self.include && self.exclude)
            || (self.protect && self.risk)
            || (deletion_class && (self.include || self.exclude || self.is_merge()));
        if contradictory {
            return Err(FilterError::syntax(rule, "invalid combination of modifiers"));
        }

        if !(self.include || self.exclude || deletion_class || self.is_merge()) {
            return Err(FilterError::syntax(rule, RULE_FORMAT_HINT));
        }
        Ok(())
    }

    /// Returns `true` for `.`/`merge` and `:`/`dir-merge` tokens.
    #[must_use]
    pub const fn is_merge(&self) -> bool {
        self.merge || self.dir_merge
    }

    /// Returns whether the `e` modifier was present.
    #[must_use]
    pub const fn excludes_merge_filename(&self) -> bool {
        self.exclude_merge_filename
    }

    /// Returns whether the `n` modifier was present.
    #[must_use]
    pub const fn disables_inheritance(&self) -> bool {
        self.no_inherit
    }

    /// Resolves the modifiers into the action the owning scope performs.
    #[must_use]
    pub const fn directive(&self) -> RuleDirective {
        let enforced = if self.include {
            Some(Polarity::Include)
        } else if self.exclude {
            Some(Polarity::Exclude)
        } else {
            None
        };

        if self.is_merge() {
            let options = MergeOptions {
                enforced,
                exclude_self: self.exclude_merge_filename,
                no_inherit: self.no_inherit,
            };
            return if self.merge {
                RuleDirective::Merge(options)
            } else {
                RuleDirective::DirMerge(options)
            };
        }

        if self.protect {
            return RuleDirective::Rule {
                polarity: Polarity::Exclude,
                classification: Classification::Protect,
            };
        }
        if self.risk {
            return RuleDirective::Rule {
                polarity: Polarity::Include,
                classification: Classification::Risk,
            };
        }

        RuleDirective::Rule {
            polarity: match enforced {
                Some(polarity) => polarity,
                None => Polarity::Exclude,
            },
            classification: Classification::Ordinary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterErrorKind;

    fn parse(token: &str) -> Result<RuleModifiers, FilterError> {
        RuleModifiers::parse(token, &format!("{token} pattern"))
    }

    fn directive(token: &str) -> RuleDirective {
        parse(token).expect("modifiers parse").directive()
    }

    #[test]
    fn short_include_and_exclude() {
        assert_eq!(
            directive("+"),
            RuleDirective::Rule {
                polarity: Polarity::Include,
                classification: Classification::Ordinary
            }
        );
        assert_eq!(
            directive("-"),
            RuleDirective::Rule {
                polarity: Polarity::Exclude,
                classification: Classification::Ordinary
            }
        );
    }

    #[test]
    fn deletion_class_letters_and_words() {
        for token in ["P", "protect", "H", "hide"] {
            assert_eq!(
                directive(token),
                RuleDirective::Rule {
                    polarity: Polarity::Exclude,
                    classification: Classification::Protect
                },
                "{token}"
            );
        }
        for token in ["R", "risk", "S", "show"] {
            assert_eq!(
                directive(token),
                RuleDirective::Rule {
                    polarity: Polarity::Include,
                    classification: Classification::Risk
                },
                "{token}"
            );
        }
    }

    #[test]
    fn long_include_exclude_keywords() {
        assert_eq!(directive("include"), directive("+"));
        assert_eq!(directive("exclude"), directive("-"));
    }

    #[test]
    fn merge_forms() {
        let expected = RuleDirective::Merge(MergeOptions {
            enforced: None,
            exclude_self: true,
            no_inherit: false,
        });
        assert_eq!(directive(".e"), expected);
        assert_eq!(directive("merge,e"), expected);
        assert_eq!(directive("merge"), RuleDirective::Merge(MergeOptions::default()));
    }

    #[test]
    fn dir_merge_forms() {
        let expected = RuleDirective::DirMerge(MergeOptions {
            enforced: None,
            exclude_self: false,
            no_inherit: true,
        });
        assert_eq!(directive(":n"), expected);
        assert_eq!(directive("dir-merge,n"), expected);
        assert!(parse(":e").expect("parses").excludes_merge_filename());
    }

    #[test]
    fn merge_with_enforced_polarity() {
        assert_eq!(
            directive("merge,-"),
            RuleDirective::Merge(MergeOptions {
                enforced: Some(Polarity::Exclude),
                exclude_self: false,
                no_inherit: false,
            })
        );
        assert_eq!(
            directive(".+en"),
            RuleDirective::Merge(MergeOptions {
                enforced: Some(Polarity::Include),
                exclude_self: true,
                no_inherit: true,
            })
        );
    }

    #[test]
    fn word_split_modifier_is_rejected() {
        let error = parse("merge,w").expect_err("w unsupported");
        assert!(error.to_string().contains("'w' is not implemented"));
        assert_eq!(error.kind(), FilterErrorKind::Syntax);
    }

    #[test]
    fn merge_letters_require_merge_marker() {
        for token in ["-e", "+n", "e"] {
            let error = parse(token).expect_err("letter without merge");
            assert!(error.to_string().contains("only valid after merge"), "{token}");
        }
    }

    #[test]
    fn unknown_character_is_reported() {
        let error = RuleModifiers::parse("+x", "+x foo").expect_err("unknown");
        let text = error.to_string();
        assert!(text.contains("unknown modifier 'x'"));
        assert!(text.contains("'+x foo'"));
    }

    #[test]
    fn contradictory_combinations_are_rejected() {
        for token in ["+-", ".:", "merge:", "PR", "protect,risk", "+P", ".P", "-R"] {
            let error = parse(token).expect_err("contradiction");
            assert!(
                error.to_string().contains("invalid combination"),
                "{token}: {error}"
            );
        }
    }

    #[test]
    fn token_without_action_is_rejected() {
        assert!(parse(",").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn separators_are_skipped() {
        assert_eq!(directive(",+,"), directive("+"));
    }
}
