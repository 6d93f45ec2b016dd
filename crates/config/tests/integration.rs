//! Integration tests for config

use std::io::Write;
use std::sync::Mutex;

use tempfile::NamedTempFile;
use upkeep_config::{fixed_paths, Config};
use upkeep_errors::{ConfigError, Error};
use upkeep_types::{ColorChoice, OutputFormat, TargetFile};

// Mutex to ensure env var tests don't run concurrently
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[general]
default_output = "plain"
color = "never"

[upgrades]
types = ["security", "updates"]
mail = "ops@x.com"
auto_reboot = true

[schedule]
update_package_lists = 1
autoclean_interval = 7
        "#
    )
    .unwrap();

    let config = Config::load_from_file(temp_file.path()).await.unwrap();
    assert_eq!(config.general.default_output, OutputFormat::Plain);
    assert_eq!(config.general.color, ColorChoice::Never);
    assert_eq!(config.upgrades.types, vec!["security", "updates"]);
    assert_eq!(config.upgrades.mail, "ops@x.com");
    assert!(config.upgrades.auto_reboot);
    assert_eq!(config.schedule.update_package_lists, 1);
    assert_eq!(config.schedule.autoclean_interval, 7);
    // Untouched sections keep their defaults
    assert_eq!(config.schedule.unattended_upgrade, 1);
    assert!(!config.upgrades.remove_unused_dependencies);
}

#[tokio::test]
async fn test_empty_file_yields_defaults() {
    let temp_file = NamedTempFile::new().unwrap();
    let config = Config::load_from_file(temp_file.path()).await.unwrap();

    assert_eq!(config.upgrades.types, vec!["security"]);
    assert_eq!(config.upgrades.mail, "root");
    assert_eq!(config.schedule.unattended_upgrade, 1);
    assert_eq!(config.schedule.update_package_lists, 0);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let missing = std::path::PathBuf::from("/nonexistent/upkeep/config.toml");
    let err = Config::load_from_file(&missing).await.unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
}

#[test]
fn test_merge_env() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();

    std::env::remove_var("UPKEEP_OUTPUT");
    std::env::remove_var("UPKEEP_COLOR");

    std::env::set_var("UPKEEP_OUTPUT", "json");
    std::env::set_var("UPKEEP_COLOR", "always");

    let mut config = Config::default();
    config.merge_env().unwrap();

    assert_eq!(config.general.default_output, OutputFormat::Json);
    assert_eq!(config.general.color, ColorChoice::Always);

    std::env::remove_var("UPKEEP_OUTPUT");
    std::env::remove_var("UPKEEP_COLOR");
}

#[test]
fn test_invalid_env_value() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap();

    std::env::set_var("UPKEEP_AUTO_REBOOT", "maybe");

    let mut config = Config::default();
    let err = config.merge_env().unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "UPKEEP_AUTO_REBOOT"
    ));

    std::env::remove_var("UPKEEP_AUTO_REBOOT");
}

#[test]
fn test_target_paths_default_and_override() {
    let config = Config::default();
    assert_eq!(
        config.target_path(TargetFile::AllowedOrigins),
        std::path::Path::new(fixed_paths::ORIGINS_FILE)
    );

    let mut config = Config::default();
    config.paths.origins_file = Some("/tmp/50unattended-upgrades".into());
    assert_eq!(
        config.target_path(TargetFile::AllowedOrigins),
        std::path::Path::new("/tmp/50unattended-upgrades")
    );
    assert_eq!(
        config.target_path(TargetFile::PeriodicSchedule),
        std::path::Path::new(fixed_paths::PERIODIC_FILE)
    );
}

#[tokio::test]
async fn test_negative_schedule_rejected_at_desired_state() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[schedule]
unattended_upgrade = -1
        "#
    )
    .unwrap();

    // Parsing succeeds; validation happens at desired-state construction
    let config = Config::load_from_file(temp_file.path()).await.unwrap();
    let err = config.desired_state().unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { ref field, ref value })
            if field == "unattended_upgrade" && value == "-1"
    ));
}

#[test]
fn test_desired_state_carries_config_values() {
    let mut config = Config::default();
    config.upgrades.types = vec!["security".into(), "backports".into()];
    config.upgrades.package_blacklist = Some("libc6 kernel*".into());
    config.schedule.download_upgradeable = 2;

    let state = config.desired_state().unwrap();
    assert_eq!(state.upgrade_types, vec!["security", "backports"]);
    assert_eq!(state.package_blacklist.as_deref(), Some("libc6 kernel*"));
    assert_eq!(state.download_upgradeable_days, 2);
}
