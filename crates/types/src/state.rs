//! Desired-state model for unattended upgrades
//!
//! `DesiredState` is the immutable value object a convergence run is built
//! from. All defaults live here; the renderer and dispatcher never carry
//! default knowledge of their own.

use serde::{Deserialize, Serialize};
use upkeep_errors::ConfigError;

/// The two configuration files this engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFile {
    /// Allowed upgrade origins and upgrade behavior (`50unattended-upgrades`)
    AllowedOrigins,
    /// APT periodic schedule (`20auto-upgrades`)
    PeriodicSchedule,
}

impl TargetFile {
    /// All managed files, in the order they are converged.
    pub const ALL: [TargetFile; 2] = [Self::AllowedOrigins, Self::PeriodicSchedule];
}

impl std::fmt::Display for TargetFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllowedOrigins => write!(f, "allowed-origins"),
            Self::PeriodicSchedule => write!(f, "periodic-schedule"),
        }
    }
}

/// Target settings for the unattended-upgrades mechanism.
///
/// Immutable once constructed; build through [`DesiredStateBuilder`] which
/// validates frequency values before any side effect can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    /// Upgrade classes to allow automatically (e.g. security, updates)
    pub upgrade_types: Vec<String>,
    /// Where upgrade reports are mailed
    pub mail_recipient: String,
    /// Remove dependencies that are no longer needed after an upgrade
    pub remove_unused_dependencies: bool,
    /// Reboot automatically when an upgrade requires it
    pub auto_reboot: bool,
    /// Days between package list updates (0 disables)
    pub update_package_lists_days: u32,
    /// Days between unattended upgrade runs (0 disables)
    pub unattended_upgrade_days: u32,
    /// Days between downloads of upgradeable packages (0 disables)
    pub download_upgradeable_days: u32,
    /// Days between apt autoclean runs (0 disables)
    pub autoclean_interval_days: u32,
    /// Packages never to upgrade automatically
    pub package_blacklist: Option<String>,
}

impl Default for DesiredState {
    fn default() -> Self {
        Self {
            upgrade_types: vec!["security".to_string()],
            mail_recipient: "root".to_string(),
            remove_unused_dependencies: false,
            auto_reboot: false,
            update_package_lists_days: 0,
            unattended_upgrade_days: 1,
            download_upgradeable_days: 0,
            autoclean_interval_days: 0,
            package_blacklist: None,
        }
    }
}

impl DesiredState {
    /// Start building a desired state from the defaults.
    #[must_use]
    pub fn builder() -> DesiredStateBuilder {
        DesiredStateBuilder::new()
    }

    /// Check the enable-specific invariant: at least one upgrade type.
    ///
    /// The frequency invariants are enforced at construction; this one is
    /// action-scoped, so the dispatcher calls it before touching any file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `upgrade_types` is empty.
    pub fn validate_for_enable(&self) -> Result<(), ConfigError> {
        if self.upgrade_types.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "upgrade_types".to_string(),
                value: "[]".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`DesiredState`]
///
/// Frequencies are accepted as signed integers so that out-of-range
/// configuration input is rejected here, with a field name attached, rather
/// than panicking or wrapping somewhere downstream.
#[derive(Debug, Clone)]
pub struct DesiredStateBuilder {
    upgrade_types: Vec<String>,
    mail_recipient: String,
    remove_unused_dependencies: bool,
    auto_reboot: bool,
    update_package_lists_days: i64,
    unattended_upgrade_days: i64,
    download_upgradeable_days: i64,
    autoclean_interval_days: i64,
    package_blacklist: Option<String>,
}

impl DesiredStateBuilder {
    /// Create a builder seeded with the defaults.
    #[must_use]
    pub fn new() -> Self {
        let defaults = DesiredState::default();
        Self {
            upgrade_types: defaults.upgrade_types,
            mail_recipient: defaults.mail_recipient,
            remove_unused_dependencies: defaults.remove_unused_dependencies,
            auto_reboot: defaults.auto_reboot,
            update_package_lists_days: i64::from(defaults.update_package_lists_days),
            unattended_upgrade_days: i64::from(defaults.unattended_upgrade_days),
            download_upgradeable_days: i64::from(defaults.download_upgradeable_days),
            autoclean_interval_days: i64::from(defaults.autoclean_interval_days),
            package_blacklist: defaults.package_blacklist,
        }
    }

    /// Replace the upgrade type list.
    #[must_use]
    pub fn with_upgrade_types(mut self, types: Vec<String>) -> Self {
        self.upgrade_types = types;
        self
    }

    /// Set the mail recipient.
    #[must_use]
    pub fn with_mail_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.mail_recipient = recipient.into();
        self
    }

    /// Set whether unused dependencies are removed.
    #[must_use]
    pub fn with_remove_unused_dependencies(mut self, remove: bool) -> Self {
        self.remove_unused_dependencies = remove;
        self
    }

    /// Set the automatic reboot policy.
    #[must_use]
    pub fn with_auto_reboot(mut self, reboot: bool) -> Self {
        self.auto_reboot = reboot;
        self
    }

    /// Set the package list update frequency in days.
    #[must_use]
    pub fn with_update_package_lists_days(mut self, days: i64) -> Self {
        self.update_package_lists_days = days;
        self
    }

    /// Set the unattended upgrade frequency in days.
    #[must_use]
    pub fn with_unattended_upgrade_days(mut self, days: i64) -> Self {
        self.unattended_upgrade_days = days;
        self
    }

    /// Set the upgradeable package download frequency in days.
    #[must_use]
    pub fn with_download_upgradeable_days(mut self, days: i64) -> Self {
        self.download_upgradeable_days = days;
        self
    }

    /// Set the autoclean interval in days.
    #[must_use]
    pub fn with_autoclean_interval_days(mut self, days: i64) -> Self {
        self.autoclean_interval_days = days;
        self
    }

    /// Set the package blacklist.
    #[must_use]
    pub fn with_package_blacklist(mut self, blacklist: Option<String>) -> Self {
        self.package_blacklist = blacklist;
        self
    }

    /// Validate and construct the desired state.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when any frequency is negative or
    /// does not fit the day-count range.
    pub fn build(self) -> Result<DesiredState, ConfigError> {
        Ok(DesiredState {
            upgrade_types: self.upgrade_types,
            mail_recipient: self.mail_recipient,
            remove_unused_dependencies: self.remove_unused_dependencies,
            auto_reboot: self.auto_reboot,
            update_package_lists_days: frequency(
                "update_package_lists",
                self.update_package_lists_days,
            )?,
            unattended_upgrade_days: frequency("unattended_upgrade", self.unattended_upgrade_days)?,
            download_upgradeable_days: frequency(
                "download_upgradeable",
                self.download_upgradeable_days,
            )?,
            autoclean_interval_days: frequency("autoclean_interval", self.autoclean_interval_days)?,
            package_blacklist: self.package_blacklist,
        })
    }
}

impl Default for DesiredStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn frequency(field: &str, days: i64) -> Result<u32, ConfigError> {
    u32::try_from(days).map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: days.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_resource_schema() {
        let state = DesiredState::default();
        assert_eq!(state.upgrade_types, vec!["security".to_string()]);
        assert_eq!(state.mail_recipient, "root");
        assert!(!state.remove_unused_dependencies);
        assert!(!state.auto_reboot);
        assert_eq!(state.update_package_lists_days, 0);
        assert_eq!(state.unattended_upgrade_days, 1);
        assert_eq!(state.download_upgradeable_days, 0);
        assert_eq!(state.autoclean_interval_days, 0);
        assert!(state.package_blacklist.is_none());
    }

    #[test]
    fn builder_defaults_build() {
        let state = DesiredState::builder().build().unwrap();
        assert_eq!(state, DesiredState::default());
    }

    #[test]
    fn negative_frequency_rejected() {
        let err = DesiredState::builder()
            .with_unattended_upgrade_days(-1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, ref value }
                if field == "unattended_upgrade" && value == "-1"
        ));
    }

    #[test]
    fn each_negative_frequency_names_its_field() {
        let cases: [(fn(DesiredStateBuilder, i64) -> DesiredStateBuilder, &str); 4] = [
            (
                DesiredStateBuilder::with_update_package_lists_days,
                "update_package_lists",
            ),
            (
                DesiredStateBuilder::with_unattended_upgrade_days,
                "unattended_upgrade",
            ),
            (
                DesiredStateBuilder::with_download_upgradeable_days,
                "download_upgradeable",
            ),
            (
                DesiredStateBuilder::with_autoclean_interval_days,
                "autoclean_interval",
            ),
        ];
        for (set, expected) in cases {
            let err = set(DesiredState::builder(), -7).build().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref field, .. } if field == expected)
            );
        }
    }

    #[test]
    fn empty_upgrade_types_fails_enable_validation() {
        let state = DesiredState::builder()
            .with_upgrade_types(Vec::new())
            .build()
            .unwrap();
        assert!(state.validate_for_enable().is_err());
    }
}
