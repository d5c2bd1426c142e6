use std::fmt;

/// Whether a matching rule includes or excludes the path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Polarity {
    /// The path participates (transfer) or may be deleted (risk).
    Include,
    /// The path is skipped (transfer) or kept from deletion (protect).
    Exclude,
}

impl Polarity {
    /// Returns the short prefix used by the rule grammar.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Include => '+',
            Self::Exclude => '-',
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.write_str("include"),
            Self::Exclude => f.write_str("exclude"),
        }
    }
}

/// Which rule list a rule belongs to.
///
/// Ordinary rules decide transfer inclusion. Protect and risk rules are only
/// consulted during a deletion pass; protect is exclude-equivalent and risk
/// is include-equivalent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Classification {
    /// Plain include/exclude rule.
    Ordinary,
    /// Keeps matching destination paths from being deleted.
    Protect,
    /// Allows matching destination paths to be deleted.
    Risk,
}

impl Classification {
    /// Returns `true` for protect and risk rules.
    #[must_use]
    pub const fn is_deletion_class(self) -> bool {
        matches!(self, Self::Protect | Self::Risk)
    }

    /// Polarity implied by a deletion-class classification.
    #[must_use]
    pub const fn implied_polarity(self) -> Option<Polarity> {
        match self {
            Self::Ordinary => None,
            Self::Protect => Some(Polarity::Exclude),
            Self::Risk => Some(Polarity::Include),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => f.write_str("ordinary"),
            Self::Protect => f.write_str("protect"),
            Self::Risk => f.write_str("risk"),
        }
    }
}
