//! Output format for the diagnostics `rcli` writes to standard error.
//!
//! Command output always goes to standard output untouched; this setting only
//! shapes the tracing events that accompany it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How `rcli` renders its diagnostic events.
///
/// Accepted spellings in configuration files, `RCLI_LOG_FORMAT` and
/// `--log-format` are `compact` and `json`, matched without regard to case.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, for scripts that collect daemon sessions.
    Json,
    /// One terse line per event, for reading at a terminal.
    #[default]
    Compact,
}

/// Error returned when a log format name is not recognised.
pub type LogFormatParseError = strum::ParseError;
