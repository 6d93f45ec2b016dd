//! Centralized, non-configurable filesystem paths for upkeep
//!
//! The APT paths can be overridden through the `[paths]` section for tests
//! and hermetic runs; these constants are the production defaults.

pub const ORIGINS_FILE: &str = "/etc/apt/apt.conf.d/50unattended-upgrades";
pub const PERIODIC_FILE: &str = "/etc/apt/apt.conf.d/20auto-upgrades";

pub const OS_RELEASE: &str = "/etc/os-release";

pub const LOGS_DIR: &str = "/var/log/upkeep";
