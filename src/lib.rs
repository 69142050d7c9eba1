//! msgen is a project scaffolding tool for microservices.
//! It asks for a project name and a set of feature flags, then copies a
//! template directory into a new project, substituting the name for
//! placeholders and keeping or dropping `[if ...]` blocks based on the flags.

/// Collection of the project name and flag values
pub mod answers;

/// Command-line interface module for the msgen application
pub mod cli;

/// Configuration handling for msgen templates
/// Supports JSON and YAML formats (msgen.json, msgen.yml, msgen.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Conditional `[if]`/`[else]`/`[endif]` blocks
pub mod directive;

/// Error types and handling for the msgen application
pub mod error;

/// Boolean conditions evaluated by `[if ...]` directives
pub mod expr;

/// Flag lookup used by the directive engine
pub mod flags;

/// File and directory ignore patterns
/// Processes .msgenignore files to exclude specific paths
pub mod ignore;

/// Core template processing orchestration
/// Combines all components to generate the final output
pub mod processor;

/// User input and interaction handling
pub mod prompt;

pub use directive::render;
pub use expr::evaluate;
pub use flags::FlagSet;
