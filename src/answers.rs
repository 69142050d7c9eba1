//! Collects the project name and flag values.
//!
//! Every question is answered from the first source that has a value:
//! command-line overrides, answers preloaded from stdin, then the interactive
//! prompt (or the question's default when running non-interactively).

use crate::config::Config;
use crate::constants::PROJECT_NAME_KEY;
use crate::error::{Error, Result};
use crate::flags::FlagSet;
use crate::prompt::{yes_no_prompt, Prompter};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use regex::Regex;
use std::io::Read;

/// Everything the generator needs to know about the project being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub project_name: String,
    pub flags: IndexMap<String, bool>,
}

impl FlagSet for Answers {
    fn lookup(&self, name: &str) -> bool {
        self.flags.lookup(name)
    }
}

impl Answers {
    /// Human readable overview shown before generation is confirmed.
    pub fn summary(&self) -> String {
        let mut out = format!("Project name: {}\n", self.project_name);
        for (key, value) in &self.flags {
            out.push_str(&format!("{key}: {}\n", if *value { "Yes" } else { "No" }));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(PROJECT_NAME_KEY.to_string(), self.project_name.clone().into());
        for (key, value) in &self.flags {
            map.insert(key.clone(), (*value).into());
        }
        serde_json::Value::Object(map)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub name: Option<String>,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
}

impl Overrides {
    fn flag(&self, key: &str) -> Option<bool> {
        if self.enable.iter().any(|k| k == key) {
            Some(true)
        } else if self.disable.iter().any(|k| k == key) {
            Some(false)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(key) = self.enable.iter().find(|k| self.disable.contains(k)) {
            return Err(Error::ValidationError(format!(
                "flag '{key}' is both enabled and disabled"
            )));
        }
        Ok(())
    }
}

/// Checks a project name and returns it trimmed.
pub fn validate_project_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::ValidationError("project name is required".to_string()));
    }
    let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$")
        .map_err(|e| Error::ValidationError(e.to_string()))?;
    if !re.is_match(name) {
        return Err(Error::ValidationError(format!(
            "'{name}' is not a valid project name: use letters, digits, '.', '_' and '-'"
        )));
    }
    Ok(name.to_string())
}

/// Parses preloaded answers. Empty input means no answers.
pub fn parse_preloaded_answers(content: &str) -> Result<serde_json::Value> {
    if content.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(Error::ValidationError("answers must be a JSON object".to_string()));
    }
    Ok(value)
}

pub fn load_from_stdin() -> Result<serde_json::Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_preloaded_answers(&buffer)
}

pub fn get_answers_from(take_from_stdin: bool) -> Result<serde_json::Value> {
    if take_from_stdin {
        load_from_stdin()
    } else {
        Ok(serde_json::Value::Null)
    }
}

fn preloaded_flag(preloaded: &serde_json::Value, key: &str) -> Option<bool> {
    match preloaded.get(key)? {
        serde_json::Value::Bool(value) => Some(*value),
        serde_json::Value::String(s) => match yes_no_prompt(s) {
            (true, value) => Some(value),
            (false, _) => {
                warn!("Ignoring preloaded answer '{s}' for '{key}': expected yes or no");
                None
            }
        },
        other => {
            warn!("Ignoring preloaded answer {other} for '{key}': expected a boolean");
            None
        }
    }
}

fn warn_unknown_keys(config: &Config, preloaded: &serde_json::Value, overrides: &Overrides) {
    for key in overrides.enable.iter().chain(&overrides.disable) {
        if !config.flags.contains_key(key) {
            warn!("Flag '{key}' is not declared by the template");
        }
    }
    if let Some(map) = preloaded.as_object() {
        for key in map.keys() {
            if key != PROJECT_NAME_KEY && !config.flags.contains_key(key) {
                warn!("Preloaded answer '{key}' is not declared by the template");
            }
        }
    }
}

/// Collects answers for every question in `config`.
///
/// Flags that are set from the command line or stdin but not declared by the
/// template are kept as well, after the declared ones.
///
/// # Arguments
/// * `prompter` - Used for questions nobody answered yet
/// * `config` - Template questions
/// * `preloaded` - JSON object read from stdin, or `Null`
/// * `overrides` - Command-line values
/// * `interactive` - Whether the user may be asked at all
pub fn get_answers(
    prompter: &dyn Prompter,
    config: &Config,
    preloaded: &serde_json::Value,
    overrides: &Overrides,
    interactive: bool,
) -> Result<Answers> {
    overrides.validate()?;
    warn_unknown_keys(config, preloaded, overrides);

    let fixed_name = overrides
        .name
        .clone()
        .or_else(|| preloaded.get(PROJECT_NAME_KEY)?.as_str().map(str::to_string));

    let mut default_name = config.name.default.clone().unwrap_or_default();
    let mut default_flags: IndexMap<String, bool> =
        config.flags.iter().map(|(key, q)| (key.clone(), q.default)).collect();

    let mut extra_keys: IndexSet<String> =
        overrides.enable.iter().chain(&overrides.disable).cloned().collect();
    if let Some(map) = preloaded.as_object() {
        extra_keys.extend(map.keys().filter(|k| *k != PROJECT_NAME_KEY).cloned());
    }
    extra_keys.retain(|key| !config.flags.contains_key(key));

    loop {
        let mut asked = false;

        let project_name = match &fixed_name {
            Some(name) => validate_project_name(name)?,
            None if interactive => loop {
                asked = true;
                let input = prompter.text(&config.name.help, &default_name)?;
                match validate_project_name(&input) {
                    Ok(name) => break name,
                    Err(e) => eprintln!("{e}"),
                }
            },
            None => validate_project_name(&default_name)?,
        };

        let mut flags = IndexMap::new();
        for (key, question) in &config.flags {
            let value = match overrides.flag(key).or_else(|| preloaded_flag(preloaded, key)) {
                Some(value) => value,
                None if interactive => {
                    asked = true;
                    prompter.confirm(&question.prompt(key), default_flags[key])?
                }
                None => default_flags[key],
            };
            flags.insert(key.clone(), value);
        }
        for key in &extra_keys {
            if let Some(value) = overrides.flag(key).or_else(|| preloaded_flag(preloaded, key)) {
                flags.insert(key.clone(), value);
            }
        }

        let answers = Answers { project_name, flags };
        debug!("Collected answers: {}", answers.to_json());

        if !asked {
            return Ok(answers);
        }

        println!("\n{}", answers.summary());
        if prompter.confirm("All filled correctly?", true)? {
            return Ok(answers);
        }

        default_name = answers.project_name;
        default_flags.extend(answers.flags);
    }
}
