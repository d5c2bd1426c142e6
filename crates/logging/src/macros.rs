//! crates/logging/src/macros.rs
//! `info_log!` and `debug_log!` macros gated on the thread-local verbosity.
//!
//! The message is only formatted when the flag is enabled at the requested
//! level, so callers may pass expensive arguments freely.

/// Records an info event when `--info=<flag><level>` (or `-v`) enables it.
///
/// ```
/// use logging::{info_log, drain_events, init, VerbosityConfig};
///
/// init(VerbosityConfig::from_verbose_level(1));
/// info_log!(Name, 1, "{}", "./src/lib.rs");
/// info_log!(Skip, 1, "suppressed at -v");
///
/// let events = drain_events();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].message(), "./src/lib.rs");
/// ```
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {
        if $crate::info_gte($crate::InfoFlag::$flag, $level) {
            $crate::emit_info($crate::InfoFlag::$flag, $level, ::std::format!($($arg)+));
        }
    };
}

/// Records a debug event when `--debug=<flag><level>` (or `-vv` and above)
/// enables it.
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, ::std::format!($($arg)+));
        }
    };
}
