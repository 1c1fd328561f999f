//! Error types for the `diva` command line.

use std::path::PathBuf;

use diva::error::DivaError;
use thiserror::Error;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, DivaCliError>;

/// Errors surfaced to the user by the CLI.
#[derive(Error, Debug)]
pub enum DivaCliError {
  /// Failure inside the crawler library
  #[error(transparent)]
  Diva(#[from] DivaError),

  /// Reading input or writing output failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A publication could not be rendered as JSON
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// `init` would overwrite an existing configuration
  #[error("configuration already exists at {}, pass --force to overwrite it", .0.display())]
  ConfigExists(PathBuf),
}
