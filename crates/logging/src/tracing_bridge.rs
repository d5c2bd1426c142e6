//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the filter verbosity flags.
//!
//! [`FilterLayer`] is a `tracing-subscriber` layer that turns events emitted
//! under `rsync::*` targets into [`DiagnosticEvent`](crate::DiagnosticEvent)s,
//! but only when the matching info or debug flag is enabled on the current
//! thread. The `filters` crate emits its events under `rsync::filter`, so
//! `--debug=filter` (or `-vv`) surfaces rule additions and decisions while
//! `--debug=filter2` adds per-rule evaluations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! init_tracing(config);
//!
//! tracing::debug!(target: "rsync::filter", "rule added");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use std::fmt::Write as _;
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that maps `rsync::*` events onto verbosity flags.
#[derive(Clone, Debug, Default)]
pub struct FilterLayer {
    _private: (),
}

impl FilterLayer {
    /// Create a new layer. Gating reads the thread-local configuration at
    /// event time, so the layer itself holds no state.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        let category = target.rsplit("::").next()?;
        match category {
            "name" => Some(InfoFlag::Name),
            "skip" => Some(InfoFlag::Skip),
            "stats" => Some(InfoFlag::Stats),
            "delete" => Some(InfoFlag::Del),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        // whole path components only, so "rsync::filters_extra" is unmapped
        let category = target.rsplit("::").next()?;
        match category {
            "filter" => Some(DebugFlag::Filter),
            "flist" | "walk" => Some(DebugFlag::Flist),
            "del" => Some(DebugFlag::Del),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::TRACE => 2,
            _ => 1,
        }
    }
}

impl<S> Layer<S> for FilterLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if !target.starts_with("rsync::") {
            return;
        }
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        // Debug flags are the more specific mapping
        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                emit_debug(debug_flag, verbosity_level, render(event));
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                emit_info(info_flag, verbosity_level, render(event));
            }
        }
    }
}

fn render(event: &tracing::Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.finish()
}

/// Collects the message followed by `key=value` pairs for other fields.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), &format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field.name(), &value);
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// The thread-local configuration is replaced and a global subscriber is
/// installed with [`FilterLayer`] behind an [`EnvFilter`] read from
/// `RUST_LOG`. When `RUST_LOG` is unset every `rsync` target passes the
/// filter and the verbosity flags alone decide what is recorded.
///
/// Returns `false` when a global subscriber was already installed; the
/// thread-local configuration is updated either way.
pub fn init_tracing(config: VerbosityConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsync=trace"));

    tracing_subscriber::registry()
        .with(filter)
        .with(FilterLayer::new())
        .try_init()
        .is_ok()
}
