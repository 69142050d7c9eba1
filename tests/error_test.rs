use std::io;

use msgen::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(Error::from(json_err), Error::JSONParseError(_)));
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::ValidationError("project name is required".to_string());
    assert_eq!(err.to_string(), "Validation error: project name is required.");

    let err = Error::OutputDirectoryExistsError { output_dir: "orders".to_string() };
    assert_eq!(
        err.to_string(),
        "Output directory 'orders' already exists. Use --force to overwrite it."
    );

    assert_eq!(Error::Cancelled.to_string(), "Generation cancelled.");
}
