#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for upkeep host operations.
//!
//! This crate provides the seams between the convergence engine and the
//! host it manages:
//! - Host facts (platform family predicate, file existence)
//! - File effects (idempotent ensure-content writes)
//! - Command effects (argv-style host command execution)
//!
//! The dispatcher in `upkeep-ops` depends only on the traits defined here,
//! never on the concrete host-backed implementations.

pub mod facts;
pub mod file;
pub mod process;

pub use facts::{HostFacts, OsRelease, SystemFacts};
pub use file::{FileEffect, FsFileEffect, Ownership};
pub use process::{CommandEffect, CommandOutput, HostCommand, HostCommandEffect};
