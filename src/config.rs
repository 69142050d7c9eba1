//! Configuration handling for msgen templates.
//! This module loads the optional template configuration file that declares
//! the project name question, the placeholder tokens and the boolean flags a
//! template understands.
//!
//! # Example
//! ```yaml
//! name:
//!   help: "Enter project name"
//!   default: "my-service"
//! placeholders: ["<CHARTNAME>", "project_name"]
//! flags:
//!   UseREST:
//!     help: "Include REST?"
//!     default: true
//!   UseWorkers:
//!     help: "Add workers?"
//! ```

use crate::constants::{CONFIG_FILES, DEFAULT_FLAGS, DEFAULT_PLACEHOLDERS};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// The project name prompt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NameQuestion {
    #[serde(default = "default_name_help")]
    pub help: String,
    #[serde(default)]
    pub default: Option<String>,
}

fn default_name_help() -> String {
    "Enter project name".to_string()
}

impl Default for NameQuestion {
    fn default() -> Self {
        Self { help: default_name_help(), default: None }
    }
}

/// A yes/no question that sets one flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlagQuestion {
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub default: bool,
}

impl FlagQuestion {
    /// Prompt text, falling back to the flag name when no help is given.
    pub fn prompt(&self, key: &str) -> String {
        if self.help.trim().is_empty() {
            format!("Include {key}?")
        } else {
            self.help.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub name: NameQuestion,
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,
    #[serde(default)]
    pub flags: IndexMap<String, FlagQuestion>,
}

fn default_placeholders() -> Vec<String> {
    DEFAULT_PLACEHOLDERS.iter().map(|p| p.to_string()).collect()
}

/// The built-in microservice questionnaire.
impl Default for Config {
    fn default() -> Self {
        let flags = DEFAULT_FLAGS
            .iter()
            .map(|(key, help)| {
                (key.to_string(), FlagQuestion { help: help.to_string(), default: false })
            })
            .collect();

        Self { name: NameQuestion::default(), placeholders: default_placeholders(), flags }
    }
}

impl Config {
    /// Checks that every declared flag can be referenced from a condition.
    pub fn validate(&self) -> Result<()> {
        for key in self.flags.keys() {
            let is_keyword = ["and", "or", "not"].iter().any(|kw| key.eq_ignore_ascii_case(kw));
            let has_separator = key.chars().any(|c| c.is_whitespace() || c == '(' || c == ')');
            if key.is_empty() || is_keyword || has_separator {
                return Err(Error::ConfigError(format!(
                    "'{key}' cannot be used as a flag name"
                )));
            }
        }
        if self.placeholders.iter().any(|p| p.is_empty()) {
            return Err(Error::ConfigError("placeholders must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads configuration content from a template directory, trying multiple file formats.
///
/// # Arguments
/// * `template_dir` - Directory containing the template configuration
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the first found configuration file,
///   or `None` when the template has none
pub fn load_config<P: AsRef<Path>>(
    template_dir: P,
    config_files: &[&str],
) -> Result<Option<String>> {
    for file in config_files {
        let config_path = template_dir.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }

    debug!("No configuration file found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content. JSON is tried first, YAML second.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = match serde_json::from_str(content) {
        Ok(config) => config,
        Err(_) => serde_yaml::from_str(content)?,
    };
    config.validate()?;
    Ok(config)
}

/// Returns the template's configuration, or the built-in one if it has none.
pub fn get_config<P: AsRef<Path>>(template_dir: P) -> Result<Config> {
    match load_config(template_dir, &CONFIG_FILES)? {
        Some(content) => parse_config(&content),
        None => Ok(Config::default()),
    }
}
