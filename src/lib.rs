//! Qtprep - Qt provisioning for the Vircadia prebuild pipeline.
//!
//! Qtprep runs as one step of the prebuild: it decides how Qt will be
//! supplied to the native build (system packages, a user-supplied install
//! directory, or a downloaded prebuilt package), fetches and unpacks the
//! package when one is needed, and writes the `qt.cmake` fragment the
//! build system's dependency discovery includes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Environment variable access and build-root configuration
//! - [`error`] - Error types, exit codes, and result aliases
//! - [`fetch`] - Package download and archive extraction
//! - [`platform`] - Host OS, CPU architecture, and Linux distro facts
//! - [`provision`] - Qt source resolution, install, and config generation
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use qtprep::config::ProcessEnv;
//! use qtprep::fetch::HttpPackageFetcher;
//! use qtprep::platform::HostInfo;
//! use qtprep::provision::QtProvisioner;
//!
//! let host = HostInfo::detect();
//! let provisioner = QtProvisioner::new(Path::new("build"), &ProcessEnv, &host)?;
//! provisioner.install(&HttpPackageFetcher::new())?;
//! provisioner.write_config()?;
//! # Ok::<(), qtprep::QtPrepError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod provision;

pub use error::{QtPrepError, Result};
