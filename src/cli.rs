//! Command-line interface implementation for msgen.
//! Provides argument parsing and help text formatting using clap.

use crate::answers::Overrides;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for msgen.
#[derive(Parser, Debug)]
#[command(author, version, about = "msgen: microservice scaffolding from conditional templates", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(short, long, value_name = "DIR")]
    pub template_path: PathBuf,

    /// Directory where the generated project will be created
    /// (defaults to the project name in the current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Project name; skips the name prompt
    #[arg(short, long)]
    pub name: Option<String>,

    /// Turn a flag on; may be repeated
    #[arg(short, long, value_name = "FLAG")]
    pub enable: Vec<String>,

    /// Turn a flag off; may be repeated
    #[arg(short, long, value_name = "FLAG")]
    pub disable: Vec<String>,

    /// Read answers as a JSON object from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Do not ask anything: unanswered questions take their defaults
    /// and the final confirmation is skipped
    #[arg(short, long)]
    pub yes: bool,

    /// Generate into an existing output directory
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Answers given directly on the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            name: self.name.clone(),
            enable: self.enable.clone(),
            disable: self.disable.clone(),
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
