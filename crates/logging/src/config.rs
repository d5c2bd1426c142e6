//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a `-v` count.
    ///
    /// Each level includes everything the previous one enabled. Counts above
    /// four behave like four.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config.info.name = 1;
            config.info.del = 1;
            config.info.stats = 1;
        }
        if level >= 2 {
            config.info.name = 2;
            config.info.skip = 1;
            config.debug.del = 1;
            config.debug.filter = 1;
            config.debug.flist = 1;
        }
        if level >= 3 {
            config.debug.del = 2;
            config.debug.filter = 2;
            config.debug.flist = 2;
        }
        if level >= 4 {
            config.debug.del = 3;
            config.debug.flist = 3;
        }

        config
    }

    /// Apply a single info flag token (e.g., "skip2", "name", "all0").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "all" => self.info.set_all(level),
            "none" => self.info.set_all(0),
            _ => {
                let flag = InfoFlag::from_name(name)
                    .ok_or_else(|| format!("unknown info flag: {name}"))?;
                self.info.set(flag, level);
            }
        }
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "filter2", "flist").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "all" => self.debug.set_all(level),
            "none" => self.debug.set_all(0),
            _ => {
                let flag = DebugFlag::from_name(name)
                    .ok_or_else(|| format!("unknown debug flag: {name}"))?;
                self.debug.set(flag, level);
            }
        }
        Ok(())
    }

    /// Apply a comma separated list of info tokens, as given to `--info`.
    pub fn apply_info_flags(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_info_flag(token))
    }

    /// Apply a comma separated list of debug tokens, as given to `--debug`.
    pub fn apply_debug_flags(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "skip2" into ("skip", 2) or "del" into ("del", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}
