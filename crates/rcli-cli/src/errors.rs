//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use rcli_client::ClientError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise diagnostics: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to read standard input: {0}")]
    ReadStdin(io::Error),
    #[error("failed to write daemon output: {0}")]
    WriteOutput(io::Error),
    #[error("failed to render inspect output: {0}")]
    RenderInspect(serde_json::Error),
}
