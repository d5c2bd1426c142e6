//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

use std::fmt;

/// Info flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Deletion classification of entries.
    Del,
    /// Names of entries selected for transfer.
    Name,
    /// Entries skipped by an exclude rule.
    Skip,
    /// Filter statistics at the end of a run.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in the order `--info=help` lists them.
    pub const ALL: [Self; 4] = [Self::Del, Self::Name, Self::Skip, Self::Stats];

    /// Token used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Del => "del",
            Self::Name => "name",
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }

    /// Looks a flag up by its command-line token.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.as_str() == name)
    }
}

impl fmt::Display for InfoFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Deletion pass decisions.
    Del,
    /// Filter rule parsing, merge files and rule evaluation.
    Filter,
    /// Directory walk and scope construction.
    Flist,
}

impl DebugFlag {
    /// Every debug flag, in the order `--debug=help` lists them.
    pub const ALL: [Self; 3] = [Self::Del, Self::Filter, Self::Flist];

    /// Token used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Del => "del",
            Self::Filter => "filter",
            Self::Flist => "flist",
        }
    }

    /// Looks a flag up by its command-line token.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.as_str() == name)
    }
}

impl fmt::Display for DebugFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Deletion classification level.
    pub del: u8,
    /// Transferred name level.
    pub name: u8,
    /// Skipped entry level.
    pub skip: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    #[must_use]
    pub const fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Del => self.del,
            InfoFlag::Name => self.name,
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Del => self.del = level,
            InfoFlag::Name => self.name = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Deletion pass level.
    pub del: u8,
    /// Filter processing level.
    pub filter: u8,
    /// Walk level.
    pub flist: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    #[must_use]
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Del => self.del,
            DebugFlag::Filter => self.filter,
            DebugFlag::Flist => self.flist,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Del => self.del = level,
            DebugFlag::Filter => self.filter = level,
            DebugFlag::Flist => self.flist = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}
