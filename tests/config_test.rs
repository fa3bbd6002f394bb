use clap::Parser;
use formgen::cli::Cli;
use formgen::config::Settings;
use std::fs;

#[test]
fn test_defaults_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::from_root(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.generation.model, "gemini-2.5-flash");
    assert!(settings.generation.base_url.is_none());
}

#[test]
fn test_config_file_values_loaded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("formgen.toml"),
        r#"
[server]
host = "0.0.0.0"
port = 9100

[generation]
model = "gemini-1.5-pro"
api_key_env = "MY_GEMINI_KEY"
temperature = 0.2
"#,
    )
    .unwrap();

    let settings = Settings::from_root(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.generation.model, "gemini-1.5-pro");
    assert_eq!(
        settings.generation.api_key_env.as_deref(),
        Some("MY_GEMINI_KEY")
    );
    assert_eq!(settings.generation.temperature, Some(0.2));
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("formgen.toml");
    fs::write(
        &config_path,
        r#"
[server]
host = "10.0.0.1"
port = 9100
"#,
    )
    .unwrap();

    let cli = Cli::parse_from([
        "formgen",
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "7777",
        "--model",
        "gemini-2.0-flash",
    ]);
    let settings = Settings::new_with_cli(&cli).unwrap();

    // File value kept where the CLI is silent, overridden where it speaks
    assert_eq!(settings.server.host, "10.0.0.1");
    assert_eq!(settings.server.port, 7777);
    assert_eq!(settings.generation.model, "gemini-2.0-flash");
}
