//! Diagnostic sink: a per-session level gate over `tracing` events.
//!
//! Generated statements are emitted at debug, outcomes at info/error.
//! The gate only selects which events a session emits; subscribers and
//! filtering beyond that are the host application's business.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session log verbosity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Nothing is emitted.
    #[default]
    Off,
    /// Success/outcome messages only.
    Info,
    /// Failure messages only.
    Error,
    /// Generated SQL statements only.
    Query,
    /// Everything.
    All,
}

/// Kind of a single diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageKind {
    Info,
    Error,
    Query,
}

impl LogLevel {
    pub(crate) fn admits(self, kind: MessageKind) -> bool {
        match self {
            LogLevel::Off => false,
            LogLevel::All => true,
            LogLevel::Info => kind == MessageKind::Info,
            LogLevel::Error => kind == MessageKind::Error,
            LogLevel::Query => kind == MessageKind::Query,
        }
    }
}

/// Emits one diagnostic message if the session level admits its kind.
pub(crate) fn emit(level: LogLevel, kind: MessageKind, message: &str) {
    if !level.admits(kind) {
        return;
    }
    match kind {
        MessageKind::Info => tracing::info!(target: "sqlite_session", "{message}"),
        MessageKind::Error => tracing::error!(target: "sqlite_session", "{message}"),
        MessageKind::Query => tracing::debug!(target: "sqlite_session", "{message}"),
    }
}

/// Installs a global compact-format subscriber for binaries.
///
/// `RUST_LOG` wins over `default_filter` when set. Call once per process.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_admits_nothing() {
        for kind in [MessageKind::Info, MessageKind::Error, MessageKind::Query] {
            assert!(!LogLevel::Off.admits(kind));
        }
    }

    #[test]
    fn all_admits_everything() {
        for kind in [MessageKind::Info, MessageKind::Error, MessageKind::Query] {
            assert!(LogLevel::All.admits(kind));
        }
    }

    #[test]
    fn single_levels_admit_their_kind_only() {
        assert!(LogLevel::Info.admits(MessageKind::Info));
        assert!(!LogLevel::Info.admits(MessageKind::Query));
        assert!(LogLevel::Error.admits(MessageKind::Error));
        assert!(!LogLevel::Error.admits(MessageKind::Info));
        assert!(LogLevel::Query.admits(MessageKind::Query));
        assert!(!LogLevel::Query.admits(MessageKind::Error));
    }
}
