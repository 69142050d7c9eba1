//! Error handling for the msgen application.
//! Defines custom error types and results used throughout the application.
//!
//! The directive engine itself never fails; everything here belongs to the
//! orchestration around it.

use std::io;
use thiserror::Error;

/// Custom error types for msgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Failed to parse JSON: {0}.")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}.")]
    YAMLParseError(#[from] serde_yaml::Error),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Represents errors in processing .msgenignore files
    #[error("Ignore file error: {0}.")]
    IgnoreError(String),

    #[error("Prompt error: {0}.")]
    PromptError(String),

    #[error("Generation cancelled.")]
    Cancelled,

    /// A single template entry could not be processed; generation goes on.
    #[error("Cannot process '{source_path}': {e}.")]
    ProcessError { source_path: String, e: String },
}

/// Convenience type alias for Results with msgen's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
