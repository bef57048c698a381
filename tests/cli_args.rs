//! Integration tests for CLI argument handling
//!
//! Runs the binary for flags that exit before the terminal UI starts.

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_weatherdash"))
        .args(args)
        .env_remove("GOOGLE_MAPS_API_KEY")
        .output()
        .expect("Failed to execute weatherdash")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weatherdash"), "Help should mention weatherdash");
    assert!(stdout.contains("--theme"), "Help should mention --theme flag");
    assert!(stdout.contains("--address"), "Help should mention --address flag");
}

#[test]
fn test_invalid_theme_prints_error_and_exits() {
    let output = run_cli(&["--theme", "sepia"]);
    assert!(!output.status.success(), "Expected invalid theme to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid") || stderr.contains("possible values"),
        "Should print error message about invalid theme: {}",
        stderr
    );
}

#[test]
fn test_missing_api_key_exits_before_ui() {
    let logs = TempDir::new().expect("Failed to create temp directory");
    let log_file = logs.path().join("weatherdash.log");
    let output = run_cli(&["--log-file", log_file.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key"), "stderr: {}", stderr);
}

#[test]
fn test_incomplete_coordinates_rejected() {
    let logs = TempDir::new().expect("Failed to create temp directory");
    let log_file = logs.path().join("weatherdash.log");
    let output = run_cli(&[
        "--api-key",
        "test",
        "--lat",
        "10",
        "--log-file",
        log_file.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lat and --lng"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use weatherdash::cli::{Cli, CliError, StartupConfig};
    use weatherdash::store::MemoryPreferenceStore;
    use weatherdash::theme::ThemeMode;

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from([
            "weatherdash",
            "--api-key",
            "k",
            "--address",
            "Hangzhou",
            "--theme",
            "light",
            "--hours",
            "12",
            "--days",
            "5",
            "--language",
            "zh-CN",
            "--dump",
        ]);
        let config = StartupConfig::from_cli(&cli, &MemoryPreferenceStore::new()).unwrap();
        assert_eq!(config.address.as_deref(), Some("Hangzhou"));
        assert_eq!(config.theme, Some(ThemeMode::Light));
        assert_eq!(config.hours, 12);
        assert_eq!(config.days, 5);
        assert_eq!(config.language.as_deref(), Some("zh-CN"));
        assert!(config.dump);
    }

    #[test]
    fn test_startup_config_rejects_long_history() {
        let cli = Cli::parse_from(["weatherdash", "--api-key", "k", "--hours", "48"]);
        assert_eq!(
            StartupConfig::from_cli(&cli, &MemoryPreferenceStore::new()),
            Err(CliError::InvalidHours(48))
        );
    }
}
