//! Configuration loading and precedence tests

use emenv_config::{ConfigError, ConfigLoader, GlobalConfig, Settings};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("config.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
#[serial]
fn test_full_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[sources]
builtin = false

[packages]
provided = ["emacs", "seq"]

[network]
timeout = 10
user-agent = "custom-agent/2.0"

[paths]
state-dir = "/srv/emenv"
"#,
    );

    let settings = ConfigLoader::with_global_config(&path).load().unwrap();
    assert_eq!(
        settings,
        Settings {
            state_dir: PathBuf::from("/srv/emenv"),
            builtin_sources: false,
            provided: Some(vec!["emacs".to_string(), "seq".to_string()]),
            timeout: Duration::from_secs(10),
            user_agent: "custom-agent/2.0".to_string(),
            global_config: Some(path),
        }
    );
}

#[test]
#[serial]
fn test_empty_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "");

    let settings = ConfigLoader::with_global_config(&path).load().unwrap();
    assert_eq!(settings.global_config.as_deref(), Some(path.as_path()));
    assert!(settings.builtin_sources);
    assert_eq!(settings.provided, None);
}

#[test]
#[serial]
fn test_global_config_env_variable() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[network]\ntimeout = 7\n");

    env::set_var("EMENV_GLOBAL_CONFIG", &path);
    let settings = ConfigLoader::new().load();
    env::remove_var("EMENV_GLOBAL_CONFIG");

    assert_eq!(settings.unwrap().timeout, Duration::from_secs(7));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
#[serial]
fn test_invalid_toml_syntax() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[network\ntimeout = 1");

    let err = ConfigLoader::with_global_config(&path).load().unwrap_err();
    match err {
        ConfigError::TomlParseError { file, .. } => assert_eq!(file, path),
        other => panic!("expected TomlParseError, got {:?}", other),
    }
}

#[rstest]
#[case::unknown_section("[registry]\nurl = \"x\"\n")]
#[case::unknown_key("[sources]\nextra = true\n")]
#[case::snake_case_key("[network]\nuser_agent = \"x\"\n")]
#[case::wrong_type("[network]\ntimeout = \"fast\"\n")]
fn test_rejected_files(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);
    assert!(matches!(
        GlobalConfig::load_from_file(&path),
        Err(ConfigError::TomlParseError { .. })
    ));
}

#[test]
fn test_invalid_values_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[network]\nuser-agent = \"  \"\n");
    assert!(matches!(
        GlobalConfig::load_from_file(&path),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_explicit_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");
    assert!(matches!(
        GlobalConfig::load_from_file(&path),
        Err(ConfigError::NotFound(p)) if p == path
    ));
}

// ============================================================================
// Environment Override Tests
// ============================================================================

#[rstest]
#[case("1", false)]
#[case("true", false)]
#[case("YES", false)]
#[case("0", true)]
#[case("no", true)]
#[serial]
fn test_env_no_builtin_sources(#[case] value: &str, #[case] expected: bool) {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("EMENV_NO_BUILTIN_SOURCES", value);
    let settings = ConfigLoader::with_global_config(temp_dir.path().join("none.toml")).load();
    env::remove_var("EMENV_NO_BUILTIN_SOURCES");

    assert_eq!(settings.unwrap().builtin_sources, expected);
}

#[test]
#[serial]
fn test_env_timeout_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[network]\ntimeout = 30\n");

    env::set_var("EMENV_TIMEOUT", "90");
    let settings = ConfigLoader::with_global_config(&path).load();
    env::remove_var("EMENV_TIMEOUT");

    assert_eq!(settings.unwrap().timeout, Duration::from_secs(90));
}

#[test]
#[serial]
fn test_env_zero_timeout_rejected() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("EMENV_TIMEOUT", "0");
    let result = ConfigLoader::with_global_config(temp_dir.path().join("none.toml")).load();
    env::remove_var("EMENV_TIMEOUT");

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { field, .. }) if field == "EMENV_TIMEOUT"
    ));
}
