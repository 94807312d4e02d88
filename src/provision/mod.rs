//! Qt source resolution, package install, and cmake config generation.
//!
//! There are three ways Qt can reach the build, resolved once when the
//! provisioner is constructed, in strict precedence order:
//!
//! 1. System Qt (`VIRCADIA_USE_SYSTEM_QT`): the distribution's own packages.
//!    Linux only; no paths are resolved and no config file is written.
//! 2. A user-supplied install directory (`VIRCADIA_QT_PATH`): the directory
//!    is used as-is, with `lib/cmake` underneath it.
//! 3. A prebuilt package (default): a platform-matched archive is downloaded
//!    into the per-user cache and unpacked; the archive must contain a
//!    top-level `qt5-install` directory.
//!
//! After resolution, [`QtProvisioner::install`] performs any pending download
//! and [`QtProvisioner::write_config`] emits the `qt.cmake` fragment that
//! hands the resolved cmake prefix path to the build system.

mod patch;
mod urls;

pub use urls::package_url;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{self, EnvSource, ASSETS_URL_KEY, QT_PATH_VAR, QT_VERSION_VAR, SYSTEM_QT_VAR};
use crate::error::{QtPrepError, Result};
use crate::fetch::PackageFetcher;
use crate::platform::{HostInfo, HostOs};

/// Expected top-level directory inside a prebuilt package archive.
pub const QT5_INSTALL_DIR: &str = "qt5-install";

const DEFAULT_QT_VERSION: &str = "5.15.2";
const CONFIG_FILE_NAME: &str = "qt.cmake";

/// How Qt is supplied to the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QtSource {
    /// Distribution packages; the build discovers Qt like any other program.
    System,

    /// A user-supplied install directory.
    UserSupplied { full_path: PathBuf },

    /// A prebuilt package cached under the per-user directory.
    Packaged {
        install_root: PathBuf,
        full_path: PathBuf,
        /// Download URL, resolved only when the package is absent.
        url: Option<String>,
    },
}

impl QtSource {
    /// Root of the Qt install. Absent for system Qt.
    pub fn full_path(&self) -> Option<&Path> {
        match self {
            QtSource::System => None,
            QtSource::UserSupplied { full_path } | QtSource::Packaged { full_path, .. } => {
                Some(full_path)
            }
        }
    }

    /// Directory holding the Qt cmake config packages. Absent for system Qt.
    pub fn cmake_path(&self) -> Option<PathBuf> {
        self.full_path().map(|p| p.join("lib").join("cmake"))
    }

    /// Pending package download URL, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            QtSource::Packaged { url, .. } => url.as_deref(),
            _ => None,
        }
    }
}

/// Resolves and provisions Qt for one build root.
#[derive(Debug)]
pub struct QtProvisioner {
    config_file: PathBuf,
    version: String,
    host_os: HostOs,
    source: QtSource,
    lock_file: Option<PathBuf>,
}

impl QtProvisioner {
    /// Resolve the Qt source for `build_root` using the default per-user
    /// package cache (`~/vircadia-files/qt`).
    pub fn new(build_root: &Path, env: &dyn EnvSource, host: &HostInfo) -> Result<Self> {
        let cache_root = dirs::home_dir()
            .ok_or(QtPrepError::HomeDirUnavailable)?
            .join("vircadia-files")
            .join("qt");
        Self::with_cache_root(build_root, env, host, cache_root)
    }

    /// Resolve the Qt source with an explicit package cache root.
    pub fn with_cache_root(
        build_root: &Path,
        env: &dyn EnvSource,
        host: &HostInfo,
        cache_root: PathBuf,
    ) -> Result<Self> {
        let version = env
            .var_non_empty(QT_VERSION_VAR)
            .unwrap_or_else(|| DEFAULT_QT_VERSION.to_string());
        debug!("Resolving Qt {}", version);

        if env.var_non_empty(SYSTEM_QT_VAR).is_some() {
            // Only Linux distributions ship a usable Qt; Windows and macOS
            // hosts have to use a package.
            if host.os != HostOs::Linux {
                return Err(QtPrepError::SystemQtUnsupported {
                    os: host.os_name.clone(),
                });
            }

            info!("Using system Qt");
            return Ok(Self {
                config_file: build_root.join(CONFIG_FILE_NAME),
                version,
                host_os: host.os,
                source: QtSource::System,
                lock_file: None,
            });
        }

        // The lock root doubles as the path the lock file is named after:
        // the user directory itself, or the package cache root.
        let (lock_root, full_path, packaged) = match env.var_non_empty(QT_PATH_VAR) {
            Some(dir) => {
                let full_path = PathBuf::from(dir);
                info!("Using Qt from {}", full_path.display());
                (full_path.clone(), full_path, false)
            }
            None => {
                if !cache_root.is_dir() {
                    fs::create_dir_all(&cache_root)?;
                }
                info!("Using a packaged Qt");
                (cache_root.clone(), cache_root.join(QT5_INSTALL_DIR), true)
            }
        };

        let found = if packaged { full_path.is_dir() } else { true };
        let cmake_path = full_path.join("lib").join("cmake");

        if found {
            verify_cmake_tree(&cmake_path)?;
        }

        let lock_file = lock_path(&lock_root)?;

        let url = if found {
            None
        } else {
            let assets_url = config::read_build_env(build_root, ASSETS_URL_KEY)?;
            Some(package_url(host, &assets_url)?)
        };

        let source = if packaged {
            QtSource::Packaged {
                install_root: lock_root,
                full_path,
                url,
            }
        } else {
            QtSource::UserSupplied { full_path }
        };

        Ok(Self {
            config_file: build_root.join(CONFIG_FILE_NAME),
            version,
            host_os: host.os,
            source,
            lock_file: Some(lock_file),
        })
    }

    /// The resolved Qt source.
    pub fn source(&self) -> &QtSource {
        &self.source
    }

    /// Directory holding the Qt cmake config packages. `None` for system Qt.
    pub fn cmake_path(&self) -> Option<PathBuf> {
        self.source.cmake_path()
    }

    /// Lock file path for cross-process serialization of provisioning.
    ///
    /// Computed only; acquiring the lock is the caller's business.
    pub fn lock_file(&self) -> Option<&Path> {
        self.lock_file.as_deref()
    }

    /// The Qt version this provisioner targets.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path of the generated `qt.cmake`.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Download and unpack the prebuilt package, if one is needed.
    ///
    /// A no-op for system and user-supplied Qt, and for a package that is
    /// already present, so calling this twice never downloads twice.
    pub fn install(&self, fetcher: &dyn PackageFetcher) -> Result<()> {
        let QtSource::Packaged {
            install_root,
            full_path,
            url,
        } = &self.source
        else {
            debug!("No package install needed");
            return Ok(());
        };

        if full_path.is_dir() {
            info!("Qt has already been downloaded");
            return Ok(());
        }

        let url = url.as_deref().ok_or_else(|| {
            anyhow::anyhow!("no download URL was resolved for {}", full_path.display())
        })?;

        info!("Downloading Qt from {}", url);
        fetcher.download_and_extract(url, install_root)?;

        if !full_path.is_dir() {
            return Err(anyhow::anyhow!(
                "package archive did not contain a top-level {QT5_INSTALL_DIR} directory"
            )
            .into());
        }
        verify_cmake_tree(&full_path.join("lib").join("cmake"))?;

        if self.host_os == HostOs::Darwin {
            info!("Allowing use of QtWebEngine newer than 5.15.2");
            patch::relax_webengine_pins(full_path)?;
        }

        Ok(())
    }

    /// Write the `qt.cmake` fragment consumed by the build system.
    ///
    /// With system Qt there is no prefix path to hand over and the build
    /// skips the file entirely, so nothing is written.
    pub fn write_config(&self) -> Result<()> {
        let Some(cmake_path) = self.source.cmake_path() else {
            debug!("System Qt in use, not writing {}", self.config_file.display());
            return Ok(());
        };

        info!("Writing cmake config to {}", self.config_file.display());
        fs::write(&self.config_file, render_config(&cmake_path))?;
        Ok(())
    }
}

/// Ensure a resolved cmake directory actually contains the Qt5 package.
fn verify_cmake_tree(cmake_path: &Path) -> Result<()> {
    let qt5_dir = cmake_path.join("Qt5");
    if !qt5_dir.is_dir() {
        return Err(QtPrepError::QtDirMissing {
            cmake_path: cmake_path.to_path_buf(),
            expected: qt5_dir,
        });
    }
    debug!("Qt5 check passed, found {}", qt5_dir.display());
    Ok(())
}

/// Lock file next to `root`: its base name with `.lock` appended.
fn lock_path(root: &Path) -> Result<PathBuf> {
    let parent = root.parent().unwrap_or_else(|| Path::new("."));
    let mut name = root.file_name().map(OsString::from).unwrap_or_default();
    name.push(".lock");

    if !parent.is_dir() {
        fs::create_dir_all(parent)?;
    }

    Ok(parent.join(name))
}

/// Render the generated config.
///
/// The path is embedded twice, once cached and once recomputed; the emitted
/// guard makes cmake fail fast when a stale cache disagrees with the current
/// source tree location. Separators are normalized so Windows paths survive
/// the trip through cmake.
fn render_config(cmake_path: &Path) -> String {
    let path = cmake_path.display().to_string().replace('\\', "/");
    format!(
        "# this file auto-generated by qtprep\n\
         get_filename_component(QT_CMAKE_PREFIX_PATH \"{path}\" ABSOLUTE CACHE)\n\
         get_filename_component(QT_CMAKE_PREFIX_PATH_UNCACHED \"{path}\" ABSOLUTE)\n\
         \n\
         # If the cached cmake toolchain path is different from the computed one, exit\n\
         if(NOT (QT_CMAKE_PREFIX_PATH_UNCACHED STREQUAL QT_CMAKE_PREFIX_PATH))\n\
         \x20   message(FATAL_ERROR \"QT_CMAKE_PREFIX_PATH has changed, please wipe the build directory and rerun cmake\")\n\
         endif()\n"
    )
}
