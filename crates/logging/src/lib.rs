#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` implements rsync's `--info` / `--debug` flag system for the
//! filter tool. Each diagnostic category (`name`, `skip`, `del`, `stats` for
//! info; `filter`, `flist`, `del` for debug) carries its own level, set either
//! from a `-v` count or from explicit `FLAG<N>` tokens.
//!
//! # Design
//!
//! - [`VerbosityConfig`] holds the levels and parses command-line tokens.
//! - The active configuration lives in thread-local storage. [`info_gte`]
//!   and [`debug_gte`] gate output; [`info_log!`] and [`debug_log!`] format
//!   and record a [`DiagnosticEvent`] only when the gate is open.
//! - With the `tracing` feature, [`FilterLayer`] forwards `tracing` events
//!   under `rsync::*` targets into the same event buffer, so the structured
//!   events of the `filters` crate obey `--debug=filter`.
//!
//! # Invariants
//!
//! - A higher `-v` count never lowers a level set by a lower count.
//! - Events are buffered per thread and returned in emission order by
//!   [`drain_events`].
//!
//! # Errors
//!
//! Token parsing reports unknown flag names and malformed levels as
//! human-readable `String` errors suitable for a usage message.
//!
//! # Examples
//!
//! ```
//! use logging::{debug_log, drain_events, init, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flags("filter2").unwrap();
//! init(config);
//!
//! debug_log!(Filter, 2, "rule added: {}", "- *.o");
//! let events = drain_events();
//! assert_eq!(events[0].to_string(), "[filter] rule added: - *.o");
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, current, debug_gte, drain_events,
    emit_debug, emit_info, info_gte, init,
};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{FilterLayer, init_tracing};
