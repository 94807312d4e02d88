//! Error types for qtprep operations.
//!
//! This module defines [`QtPrepError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `QtPrepError` for provisioning failures that need distinct handling
//! - Use `anyhow::Error` (via `QtPrepError::Other`) for collaborator errors
//!   that are passed through unclassified (downloads, extraction)
//! - Guided failures carry a dedicated exit code and remediation text so the
//!   calling build pipeline can distinguish them programmatically

use std::path::PathBuf;
use thiserror::Error;

const QT_BUILDER_DOCS: &str = "https://github.com/vircadia/vircadia/tree/master/tools/qt-builder";

/// Core error type for qtprep operations.
#[derive(Debug, Error)]
pub enum QtPrepError {
    /// System Qt was requested on a platform that does not ship it.
    #[error("Using the system Qt is only supported on Linux, but the host is {os}")]
    SystemQtUnsupported { os: String },

    /// A resolved Qt install is missing its cmake config directory.
    #[error("Failed to find Qt5 directory under {cmake_path}. There should be a {expected}")]
    QtDirMissing {
        cmake_path: PathBuf,
        expected: PathBuf,
    },

    /// The per-user cache directory cannot be located.
    #[error("Could not determine the current user's home directory")]
    HomeDirUnavailable,

    /// A keyed value could not be read from the build-root configuration.
    #[error("Failed to read {key} from {path}: {message}")]
    BuildEnvUnavailable {
        key: String,
        path: PathBuf,
        message: String,
    },

    /// No prebuilt package exists for this platform. Guided failure.
    #[error("Sorry, we don't have a prebuilt Qt package for {distro} on {arch}")]
    NoPackageAvailable { distro: String, arch: String },

    /// The platform is too old to be supported. Guided failure.
    #[error("Sorry, {distro} on {arch} is too old and won't be officially supported")]
    UnsupportedPlatform { distro: String, arch: String },

    /// The CPU architecture is not one we know how to provision for.
    #[error("Unknown CPU architecture: {arch}")]
    UnknownArchitecture { arch: String },

    /// The operating system is not one we know how to provision for.
    #[error("Unknown operating system: {os}")]
    UnknownOperatingSystem { os: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QtPrepError {
    /// Process exit code for this failure.
    ///
    /// The prebuild pipeline branches on these: 2 means "no package for this
    /// platform", 3 means "platform too old". Everything else is a generic 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            QtPrepError::NoPackageAvailable { .. } => 2,
            QtPrepError::UnsupportedPlatform { .. } => 3,
            _ => 1,
        }
    }

    /// User-facing remediation text for guided failures.
    ///
    /// Returns `None` for errors that have no actionable next step.
    pub fn remediation(&self) -> Option<String> {
        match self {
            QtPrepError::NoPackageAvailable { .. } => Some(format!(
                "If this is a recent distribution, dating from 2021 or so, you can try building\n\
                 against the system Qt by running this command, and trying again:\n\
                 \x20   export VIRCADIA_USE_SYSTEM_QT=1\n\
                 \n\
                 If you'd like to try to build Qt from source, or to contribute a prebuilt\n\
                 package for your distribution, please see the documentation at:\n\
                 {QT_BUILDER_DOCS}"
            )),
            QtPrepError::UnsupportedPlatform { .. } => Some(format!(
                "Please upgrade to a more recent Linux distribution.\n\
                 \n\
                 It's also possible to build Qt for your distribution yourself, please see\n\
                 the documentation at:\n\
                 {QT_BUILDER_DOCS}"
            )),
            _ => None,
        }
    }
}

/// Result type alias for qtprep operations.
pub type Result<T> = std::result::Result<T, QtPrepError>;
