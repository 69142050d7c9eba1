//! Common constants used throughout the msgen application.

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["msgen.json", "msgen.yml", "msgen.yaml"];

/// msgen's ignore file name
pub const IGNORE_FILE: &str = ".msgenignore";

/// Key under which the project name travels in JSON answers.
pub const PROJECT_NAME_KEY: &str = "project_name";

/// Literal tokens replaced with the project name when no config overrides them.
pub const DEFAULT_PLACEHOLDERS: [&str; 2] = ["<CHARTNAME>", "project_name"];

/// Flags asked for when a template ships no configuration file.
pub const DEFAULT_FLAGS: [(&str, &str); 7] = [
    ("UseREST", "Include REST?"),
    ("UseGRPC", "Include gRPC?"),
    ("UseGraphQL", "Include GraphQL?"),
    ("UsePostgresMig", "Include PostgreSQL migrations?"),
    ("UseMongoMig", "Include MongoDB migrations?"),
    ("UseCronJobs", "Include cron jobs?"),
    ("UseWorkers", "Include workers?"),
];

/// Glob patterns that are never copied into a generated project.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 7] = [
    ".git",
    ".git/**",
    "**/.DS_Store",
    ".msgenignore",
    "msgen.json",
    "msgen.yml",
    "msgen.yaml",
];
