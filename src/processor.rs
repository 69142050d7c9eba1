//! Turns template entries into file operations.
//!
//! Every path below the template root goes through the same steps: ignore
//! check, placeholder substitution, directive rendering of the path itself,
//! and finally rendering of the file content. A path whose rendered form is
//! empty or broken is skipped, which is how `[if ...]` in a directory name
//! drops the whole subtree.

use crate::answers::Answers;
use crate::directive;
use crate::error::{Error, Result};
use crate::expr::Expr;
use globset::GlobSet;
use log::{debug, error, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// What has to happen on disk for one template entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    CreateDir { target: PathBuf },
    Copy { target: PathBuf },
    Write { target: PathBuf, content: String },
}

impl FileOperation {
    pub fn target(&self) -> &Path {
        match self {
            FileOperation::CreateDir { target }
            | FileOperation::Copy { target }
            | FileOperation::Write { target, .. } => target,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            FileOperation::CreateDir { .. } => "Creating",
            FileOperation::Copy { .. } => "Copying",
            FileOperation::Write { .. } => "Writing",
        }
    }
}

#[derive(Debug)]
pub struct ProcessResult {
    pub source: PathBuf,
    /// `None` when the entry is skipped.
    pub operation: Option<FileOperation>,
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// Checks that the template path is an existing directory.
pub fn get_template_dir<P: AsRef<Path>>(template_path: P) -> Result<PathBuf> {
    let template_path = template_path.as_ref();
    if !template_path.exists() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: template_path.display().to_string(),
        });
    }
    if !template_path.is_dir() {
        return Err(Error::TemplateError(format!(
            "'{}' is not a directory",
            template_path.display()
        )));
    }
    Ok(template_path.to_path_buf())
}

/// Replaces every placeholder in `text` with `value`, in the given order.
pub fn substitute_placeholders(text: &str, placeholders: &[String], value: &str) -> String {
    placeholders
        .iter()
        .fold(text.to_string(), |acc, placeholder| acc.replace(placeholder.as_str(), value))
}

/// Checks that a rendered relative path still names something inside the
/// output directory.
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.trim().is_empty()
        && !path.starts_with('/')
        && !path.ends_with('/')
        && path.split('/').all(|part| !part.trim().is_empty() && part != "..")
}

/// Relative path of `path` below `root`, `/`-separated.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest_path, content).map_err(Error::IoError)
}

pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, dest_path: Q) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source_path, dest_path).map(|_| ()).map_err(Error::IoError)
}

/// Performs a file operation produced by [`Processor::process`].
pub fn apply_operation(source: &Path, operation: &FileOperation) -> Result<()> {
    match operation {
        FileOperation::CreateDir { target } => fs::create_dir_all(target).map_err(Error::IoError),
        FileOperation::Copy { target } => copy_file(source, target),
        FileOperation::Write { target, content } => write_file(content, target),
    }
}

pub struct Processor<'a> {
    template_root: &'a Path,
    output_root: &'a Path,
    answers: &'a Answers,
    placeholders: &'a [String],
    ignored: &'a GlobSet,
}

impl<'a> Processor<'a> {
    pub fn new(
        template_root: &'a Path,
        output_root: &'a Path,
        answers: &'a Answers,
        placeholders: &'a [String],
        ignored: &'a GlobSet,
    ) -> Self {
        Self { template_root, output_root, answers, placeholders, ignored }
    }

    /// Whether the path or any of its parent directories is ignored.
    fn is_ignored(&self, relative: &str) -> bool {
        relative
            .match_indices('/')
            .map(|(end, _)| &relative[..end])
            .chain(std::iter::once(relative))
            .any(|prefix| self.ignored.is_match(prefix))
    }

    fn render(&self, text: &str, source: &str) -> String {
        let substituted =
            substitute_placeholders(text, self.placeholders, &self.answers.project_name);
        for condition in directive::conditions(&substituted) {
            let Ok(expr) = Expr::parse(condition) else {
                warn!(
                    "{source}: condition '{condition}' cannot be parsed and is read as one flag name"
                );
                continue;
            };
            for name in expr.identifiers() {
                if !self.answers.flags.contains_key(name) {
                    warn!("{source}: flag '{name}' is not declared and is false");
                }
            }
        }
        directive::render(&substituted, self.answers)
    }

    /// Decides what to do with one entry of the template tree.
    pub fn process(&self, source: &Path) -> Result<ProcessResult> {
        let skip = || ProcessResult { source: source.to_path_buf(), operation: None };
        let relative = relative_path(self.template_root, source).ok_or_else(|| {
            Error::ProcessError {
                source_path: source.display().to_string(),
                e: "path is outside the template or not valid UTF-8".to_string(),
            }
        })?;

        if relative.is_empty() {
            return Ok(skip());
        }
        if self.is_ignored(&relative) {
            debug!("Skipping '{relative}': ignored");
            return Ok(skip());
        }

        let rendered = self.render(&relative, &relative);
        if !is_rendered_path_valid(&rendered) {
            debug!("Skipping '{relative}': rendered path '{rendered}' is empty or invalid");
            return Ok(skip());
        }
        let target = self.output_root.join(&rendered);
        debug!("Processing '{relative}' into '{}'", target.display());

        let operation = if source.is_dir() {
            FileOperation::CreateDir { target }
        } else {
            let bytes = fs::read(source).map_err(|e| Error::ProcessError {
                source_path: relative.clone(),
                e: e.to_string(),
            })?;
            match String::from_utf8(bytes) {
                Ok(text) => FileOperation::Write { content: self.render(&text, &relative), target },
                Err(_) => {
                    debug!("'{relative}' is not UTF-8 text, copying as is");
                    FileOperation::Copy { target }
                }
            }
        };

        Ok(ProcessResult { source: source.to_path_buf(), operation: Some(operation) })
    }
}

/// One entry written to the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub action: &'static str,
    pub target: PathBuf,
}

/// Walks the template tree and generates the project into `output_root`.
///
/// A failure on a single entry is logged and generation continues with the
/// next one; only a failure to walk the tree aborts.
pub fn process_template(
    template_root: &Path,
    output_root: &Path,
    answers: &Answers,
    placeholders: &[String],
    ignored: &GlobSet,
) -> Result<Vec<Generated>> {
    debug!("Processing template '{}'", template_root.display());
    fs::create_dir_all(output_root)?;

    let processor = Processor::new(template_root, output_root, answers, placeholders, ignored);
    let mut generated = Vec::new();

    for dir_entry in WalkDir::new(template_root).sort_by_file_name() {
        let raw_entry = dir_entry.map_err(|e| Error::TemplateError(e.to_string()))?;
        let outcome = processor.process(raw_entry.path()).and_then(|result| {
            if let Some(operation) = &result.operation {
                apply_operation(&result.source, operation)?;
            }
            Ok(result)
        });

        match outcome {
            Ok(ProcessResult { operation: Some(operation), .. }) => generated.push(Generated {
                action: operation.action(),
                target: operation.target().to_path_buf(),
            }),
            Ok(_) => {}
            Err(e @ Error::ProcessError { .. }) => warn!("{e}"),
            Err(e) => error!("{e}"),
        }
    }

    Ok(generated)
}
