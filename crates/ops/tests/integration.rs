//! Integration tests for the action dispatcher
//!
//! Effect primitives are swapped for counting fakes where the property under
//! test is "no effect happened"; the convergence scenarios run against the
//! real filesystem-backed implementations in a temp directory.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use upkeep_config::Config;
use upkeep_errors::{ConfigError, Error, OpsError};
use upkeep_ops::{
    disable, enable, status, FileOutcome, FileSyncState, OpsContextBuilder, OpsCtx,
};
use upkeep_platform::{
    CommandEffect, CommandOutput, FileEffect, FsFileEffect, HostCommand, HostCommandEffect,
    HostFacts, Ownership,
};

struct StubFacts {
    debian: bool,
}

#[async_trait]
impl HostFacts for StubFacts {
    async fn is_debian_family(&self) -> bool {
        self.debian
    }

    async fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[derive(Default)]
struct CountingFileEffect {
    calls: AtomicUsize,
}

#[async_trait]
impl FileEffect for CountingFileEffect {
    async fn ensure_content(
        &self,
        _path: &Path,
        _content: &str,
        _owner: Option<Ownership>,
    ) -> Result<bool, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn read_to_string(&self, _path: &Path) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(String::new())
    }
}

#[derive(Default)]
struct CountingCommandEffect {
    calls: AtomicUsize,
}

#[async_trait]
impl CommandEffect for CountingCommandEffect {
    async fn execute(&self, _cmd: HostCommand) -> Result<CommandOutput, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CommandOutput {
            code: Some(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

struct FailingCommandEffect;

#[async_trait]
impl CommandEffect for FailingCommandEffect {
    async fn execute(&self, _cmd: HostCommand) -> Result<CommandOutput, Error> {
        Ok(CommandOutput {
            code: Some(2),
            stdout: Vec::new(),
            stderr: b"sed: couldn't open temporary file".to_vec(),
        })
    }
}

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.paths.origins_file = Some(dir.path().join("50unattended-upgrades"));
    config.paths.periodic_file = Some(dir.path().join("20auto-upgrades"));
    config.paths.enforce_ownership = false;
    config
}

fn build_ctx(
    facts: Arc<dyn HostFacts>,
    file: Arc<dyn FileEffect>,
    command: Arc<dyn CommandEffect>,
    config: Config,
) -> OpsCtx {
    let (tx, _rx) = upkeep_events::channel();
    OpsContextBuilder::new()
        .with_facts(facts)
        .with_file_effect(file)
        .with_command_effect(command)
        .with_event_sender(tx)
        .with_config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn enable_off_platform_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let file_effect = Arc::new(CountingFileEffect::default());
    let command_effect = Arc::new(CountingCommandEffect::default());

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: false }),
        file_effect.clone(),
        command_effect.clone(),
        test_config(&dir),
    );

    let report = enable(&ctx).await.unwrap();
    assert!(report.platform_skipped);
    assert!(report.files.is_empty());
    assert_eq!(file_effect.calls.load(Ordering::SeqCst), 0);
    assert_eq!(command_effect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn enable_with_empty_types_fails_before_any_effect() {
    let dir = TempDir::new().unwrap();
    let file_effect = Arc::new(CountingFileEffect::default());

    let mut config = test_config(&dir);
    config.upgrades.types = Vec::new();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        file_effect.clone(),
        Arc::new(CountingCommandEffect::default()),
        config,
    );

    let err = enable(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "upgrade_types"
    ));
    assert_eq!(file_effect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn enable_converges_both_files_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.upgrades.types = vec!["security".into(), "updates".into()];
    config.upgrades.mail = "ops@x.com".into();
    config.upgrades.auto_reboot = true;
    config.schedule.update_package_lists = 1;
    config.schedule.unattended_upgrade = 1;
    config.schedule.download_upgradeable = 0;
    config.schedule.autoclean_interval = 7;

    let origins_path = config.target_path(upkeep_types::TargetFile::AllowedOrigins);
    let periodic_path = config.target_path(upkeep_types::TargetFile::PeriodicSchedule);
    tokio::fs::write(&origins_path, "").await.unwrap();
    tokio::fs::write(&periodic_path, "").await.unwrap();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        Arc::new(CountingCommandEffect::default()),
        config,
    );

    let report = enable(&ctx).await.unwrap();
    assert!(!report.platform_skipped);
    assert_eq!(report.changed_count(), 2);

    let periodic = tokio::fs::read_to_string(&periodic_path).await.unwrap();
    assert_eq!(
        periodic,
        "APT::Periodic::Update-Package-Lists \"1\";\n\
         APT::Periodic::Unattended-Upgrade \"1\";\n\
         APT::Periodic::Download-Upgradeable-Packages \"0\";\n\
         APT::Periodic::AutocleanInterval \"7\";\n"
    );

    let origins = tokio::fs::read_to_string(&origins_path).await.unwrap();
    assert!(origins.contains("\"${distro_id}:${distro_codename}-security\";"));
    assert!(origins.contains("\"${distro_id}:${distro_codename}-updates\";"));
    assert!(origins.contains("Unattended-Upgrade::Mail \"ops@x.com\";"));
    assert!(origins.contains("Unattended-Upgrade::Automatic-Reboot \"true\";"));

    // Second pass with unchanged desired state writes nothing
    let report = enable(&ctx).await.unwrap();
    assert!(report.is_noop());
    assert_eq!(report.changed_count(), 0);
}

#[tokio::test]
async fn enable_skips_missing_file_without_creating_it() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let origins_path = config.target_path(upkeep_types::TargetFile::AllowedOrigins);
    let periodic_path = config.target_path(upkeep_types::TargetFile::PeriodicSchedule);
    // Only the periodic file pre-exists
    tokio::fs::write(&periodic_path, "").await.unwrap();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        Arc::new(CountingCommandEffect::default()),
        config,
    );

    let report = enable(&ctx).await.unwrap();
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].outcome, FileOutcome::SkippedMissing);
    assert!(matches!(
        report.files[1].outcome,
        FileOutcome::Converged { changed: true }
    ));
    assert!(!origins_path.exists());
}

#[tokio::test]
async fn disable_comments_every_line_once_per_file() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let origins_path = config.target_path(upkeep_types::TargetFile::AllowedOrigins);
    let periodic_path = config.target_path(upkeep_types::TargetFile::PeriodicSchedule);
    tokio::fs::write(
        &origins_path,
        "\"${distro_id}:${distro_codename}-security\";\n# already commented\n",
    )
    .await
    .unwrap();
    tokio::fs::write(&periodic_path, "APT::Periodic::Unattended-Upgrade \"1\";\n")
        .await
        .unwrap();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        Arc::new(HostCommandEffect::new()),
        config,
    );

    let report = disable(&ctx).await.unwrap();
    assert_eq!(report.executed_count(), 2);
    for command in &report.commands {
        assert_eq!(command.exit_code, Some(0));
    }

    let origins = tokio::fs::read_to_string(&origins_path).await.unwrap();
    assert_eq!(
        origins,
        "#\"${distro_id}:${distro_codename}-security\";\n# already commented\n"
    );
    let periodic = tokio::fs::read_to_string(&periodic_path).await.unwrap();
    assert_eq!(periodic, "#APT::Periodic::Unattended-Upgrade \"1\";\n");

    // Re-running never double-comments
    disable(&ctx).await.unwrap();
    assert_eq!(
        tokio::fs::read_to_string(&origins_path).await.unwrap(),
        origins
    );
    assert_eq!(
        tokio::fs::read_to_string(&periodic_path).await.unwrap(),
        periodic
    );
}

#[tokio::test]
async fn disable_skips_missing_files() {
    let dir = TempDir::new().unwrap();
    let command_effect = Arc::new(CountingCommandEffect::default());

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        command_effect.clone(),
        test_config(&dir),
    );

    let report = disable(&ctx).await.unwrap();
    assert_eq!(report.executed_count(), 0);
    assert_eq!(command_effect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disable_propagates_command_failure_with_output() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    tokio::fs::write(config.target_path(upkeep_types::TargetFile::AllowedOrigins), "x\n")
        .await
        .unwrap();
    tokio::fs::write(
        config.target_path(upkeep_types::TargetFile::PeriodicSchedule),
        "y\n",
    )
    .await
    .unwrap();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        Arc::new(FailingCommandEffect),
        config,
    );

    let err = disable(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Ops(OpsError::CommandFailed { code: Some(2), ref stderr, .. })
            if stderr.contains("temporary file")
    ));
}

#[tokio::test]
async fn status_tracks_sync_drift_and_missing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let origins_path = config.target_path(upkeep_types::TargetFile::AllowedOrigins);
    let periodic_path = config.target_path(upkeep_types::TargetFile::PeriodicSchedule);
    tokio::fs::write(&origins_path, "").await.unwrap();
    tokio::fs::write(&periodic_path, "").await.unwrap();

    let ctx = build_ctx(
        Arc::new(StubFacts { debian: true }),
        Arc::new(FsFileEffect::new()),
        Arc::new(CountingCommandEffect::default()),
        config,
    );

    enable(&ctx).await.unwrap();
    let report = status(&ctx).await.unwrap();
    assert!(report.debian_family);
    assert!(report.in_sync());

    // Hand-edit one file: drift
    let mut drifted = tokio::fs::read_to_string(&periodic_path).await.unwrap();
    drifted.push_str("APT::Periodic::Enable \"0\";\n");
    tokio::fs::write(&periodic_path, drifted).await.unwrap();

    let report = status(&ctx).await.unwrap();
    assert_eq!(report.files[1].state, FileSyncState::Drifted);
    assert!(!report.in_sync());

    // Remove the other: missing
    tokio::fs::remove_file(&origins_path).await.unwrap();
    let report = status(&ctx).await.unwrap();
    assert_eq!(report.files[0].state, FileSyncState::Missing);
}
