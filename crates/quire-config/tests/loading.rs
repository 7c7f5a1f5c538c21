//! Loading configuration from disk.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use quire_config::{BuildConfig, ConfigError, ConfigLoader, ConfigOverrides, load_config};
use quire_core::Verbosity;
use tempfile::TempDir;

#[test]
fn missing_root_file_yields_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let config = ConfigLoader::new(dir.path()).load()?;
    assert_eq!(config, BuildConfig::for_root(dir.path()));
    Ok(())
}

#[test]
fn root_file_is_picked_up() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("quire.json"),
        r#"{ "extensions": ["php", "inc"], "fail_fast": false, "verbosity": "debug" }"#,
    )?;

    let config = ConfigLoader::new(dir.path()).load()?;
    assert_eq!(config.extensions, vec!["php", "inc"]);
    assert!(!config.fail_fast);
    assert_eq!(config.verbosity, Verbosity::Debug);
    assert_eq!(config.source_root, dir.path());
    Ok(())
}

#[test]
fn explicit_file_must_exist() -> Result<()> {
    let dir = TempDir::new()?;
    let err = ConfigLoader::new(dir.path())
        .with_file(Some(dir.path().join("absent.json")))
        .load()
        .expect_err("missing explicit file");
    assert!(matches!(err, ConfigError::Io { .. }));
    Ok(())
}

#[test]
fn malformed_file_is_a_json_error() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("quire.json"), "{ not json")?;
    let err = ConfigLoader::new(dir.path()).load().expect_err("bad json");
    assert!(matches!(err, ConfigError::Json { .. }));
    Ok(())
}

#[test]
fn file_defaults_and_overrides_merge() -> Result<()> {
    let dir = TempDir::new()?;
    let file = dir.path().join("build.json");
    fs::write(&file, r#"{ "extensions": [".PHP"], "log_level": "info" }"#)?;

    let config = load_config(
        dir.path(),
        Some(file),
        ConfigOverrides {
            cache_path: Some(PathBuf::from("/tmp/quire-cache.json")),
            force: true,
            ..ConfigOverrides::default()
        },
    )?;

    assert_eq!(config.extensions, vec!["php"]);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.log_format, "pretty");
    assert!(config.force);
    assert_eq!(
        config.effective_cache_path(),
        PathBuf::from("/tmp/quire-cache.json")
    );
    Ok(())
}

#[test]
fn merged_config_is_validated() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("quire.json"), r#"{ "extensions": [] }"#)?;
    let err = load_config(dir.path(), None, ConfigOverrides::default())
        .expect_err("empty extensions");
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            field: "extensions",
            ..
        }
    ));
    Ok(())
}

#[test]
fn relative_cache_path_in_file_is_rooted() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("quire.json"),
        r#"{ "cache_path": "build/cache.json" }"#,
    )?;

    let config = load_config(dir.path(), None, ConfigOverrides::default())?;
    assert_eq!(
        config.effective_cache_path(),
        dir.path().join("build/cache.json")
    );

    let config = load_config(
        dir.path(),
        None,
        ConfigOverrides {
            cache_path: Some(PathBuf::from("local.json")),
            ..ConfigOverrides::default()
        },
    )?;
    assert_eq!(config.effective_cache_path(), PathBuf::from("local.json"));
    Ok(())
}
