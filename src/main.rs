//! msgen's main application entry point and orchestration logic.
//! Handles command-line argument parsing, the answer wizard and
//! coordinates interactions between different modules.

use std::path::PathBuf;

use msgen::{
    answers::{get_answers, get_answers_from},
    cli::{get_args, Args},
    config::get_config,
    error::{default_error_handler, Result},
    ignore::get_ignore_patterns,
    processor::{ensure_output_dir, get_template_dir, process_template},
    prompt::DialoguerPrompter,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the template directory
/// 2. Loads the template configuration (or the built-in questions)
/// 3. Collects answers from the command line, stdin and prompts
/// 4. Checks the output directory
/// 5. Processes template files
fn run(args: Args) -> Result<()> {
    let prompt = DialoguerPrompter::new();

    let template_root = get_template_dir(&args.template_path)?;
    let config = get_config(&template_root)?;

    let preloaded_answers = get_answers_from(args.stdin)?;
    let answers =
        get_answers(&prompt, &config, &preloaded_answers, &args.overrides(), !args.yes)?;

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from(&answers.project_name));
    let output_root = ensure_output_dir(output_dir, args.force)?;

    let ignored_patterns = get_ignore_patterns(&template_root)?;

    println!("Generating project {}...", answers.project_name);
    let generated = process_template(
        &template_root,
        &output_root,
        &answers,
        &config.placeholders,
        &ignored_patterns,
    )?;
    for entry in &generated {
        println!("{}: '{}'", entry.action, entry.target.display());
    }

    println!(
        "Project {} generated successfully in {}.",
        answers.project_name,
        output_root.display()
    );
    Ok(())
}
