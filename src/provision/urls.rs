//! Prebuilt package URL selection.
//!
//! A pure function of the host facts and the version-pinned asset base URL.
//! The macOS and aarch64 packages live outside the main asset store and are
//! pinned to fixed URLs.

use crate::error::{QtPrepError, Result};
use crate::platform::{HostInfo, HostOs};

const WINDOWS_ASSET_PATH: &str = "/dependencies/vcpkg/qt5-install-5.15.2-windows.tar.gz";
const UBUNTU_1804_AMD64_ASSET_PATH: &str =
    "/dependencies/vcpkg/qt5-install-5.15.2-ubuntu-18.04-amd64.tar.xz";

const MACOS_URL: &str =
    "https://data.moto9000.moe/vircadia_packages/qt5-install-5.15.2-qtwebengine-5.15.7-macOSXSDK10.14-macos.tar.xz";
const UBUNTU_1804_AARCH64_URL: &str =
    "http://motofckr9k.ddns.net/vircadia_packages/qt5-install-5.15.2-ubuntu-18.04-aarch64_test.tar.xz";
const DEBIAN_10_AARCH64_URL: &str =
    "https://data.moto9000.moe/vircadia_packages/qt5-install-5.15.2-debian-10-aarch64.tar.xz";

/// Select the package download URL for a host.
///
/// Ubuntu 18.04 and Debian 10 are the pinned Linux targets; newer releases of
/// those distributions fail with [`QtPrepError::NoPackageAvailable`] (system
/// Qt works there), older ones with [`QtPrepError::UnsupportedPlatform`].
pub fn package_url(host: &HostInfo, assets_url: &str) -> Result<String> {
    match host.os {
        HostOs::Windows => Ok(format!("{assets_url}{WINDOWS_ASSET_PATH}")),
        HostOs::Darwin => Ok(MACOS_URL.to_string()),
        HostOs::Linux => linux_package_url(host, assets_url),
        HostOs::Other => Err(QtPrepError::UnknownOperatingSystem {
            os: host.os_name.clone(),
        }),
    }
}

fn linux_package_url(host: &HostInfo, assets_url: &str) -> Result<String> {
    let distro_id = host.distro.as_ref().map(|d| d.id.as_str()).unwrap_or("");
    let major = host.distro.as_ref().and_then(|d| d.major);

    match host.arch.as_str() {
        "x86_64" => {
            if distro_id == "ubuntu" {
                match major {
                    Some(18) => Ok(format!("{assets_url}{UBUNTU_1804_AMD64_ASSET_PATH}")),
                    Some(m) if m > 19 => Err(no_package(host)),
                    _ => Err(unsupported(host)),
                }
            } else {
                Err(no_package(host))
            }
        }
        "aarch64" => match distro_id {
            "ubuntu" => match major {
                Some(18) => Ok(UBUNTU_1804_AARCH64_URL.to_string()),
                Some(m) if m > 19 => Err(no_package(host)),
                _ => Err(unsupported(host)),
            },
            "debian" => match major {
                Some(10) => Ok(DEBIAN_10_AARCH64_URL.to_string()),
                Some(m) if m > 10 => Err(no_package(host)),
                _ => Err(unsupported(host)),
            },
            _ => Err(no_package(host)),
        },
        other => Err(QtPrepError::UnknownArchitecture {
            arch: other.to_string(),
        }),
    }
}

fn no_package(host: &HostInfo) -> QtPrepError {
    QtPrepError::NoPackageAvailable {
        distro: host.distro_name(),
        arch: host.arch.clone(),
    }
}

fn unsupported(host: &HostInfo) -> QtPrepError {
    QtPrepError::UnsupportedPlatform {
        distro: host.distro_name(),
        arch: host.arch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSETS: &str = "https://assets.example.com";

    fn linux(arch: &str) -> HostInfo {
        HostInfo::new(HostOs::Linux, arch)
    }

    fn ubuntu(arch: &str, major: u32) -> HostInfo {
        linux(arch).with_distro("ubuntu", &format!("Ubuntu {major}.04"), Some(major), Some(4))
    }

    fn debian(arch: &str, major: u32) -> HostInfo {
        linux(arch).with_distro("debian", &format!("Debian GNU/Linux {major}"), Some(major), None)
    }

    #[test]
    fn windows_uses_asset_store() {
        let url = package_url(&HostInfo::new(HostOs::Windows, "x86_64"), ASSETS).unwrap();
        assert_eq!(
            url,
            "https://assets.example.com/dependencies/vcpkg/qt5-install-5.15.2-windows.tar.gz"
        );
    }

    #[test]
    fn darwin_uses_fixed_url() {
        let url = package_url(&HostInfo::new(HostOs::Darwin, "x86_64"), ASSETS).unwrap();
        assert!(url.contains("qtwebengine-5.15.7"));
        assert!(url.ends_with("-macos.tar.xz"));
        assert!(!url.contains(ASSETS));
    }

    #[test]
    fn ubuntu_1804_amd64_uses_asset_store() {
        let url = package_url(&ubuntu("x86_64", 18), ASSETS).unwrap();
        assert_eq!(
            url,
            "https://assets.example.com/dependencies/vcpkg/qt5-install-5.15.2-ubuntu-18.04-amd64.tar.xz"
        );
    }

    #[test]
    fn ubuntu_20_amd64_has_no_package() {
        let err = package_url(&ubuntu("x86_64", 20), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
    }

    #[test]
    fn ubuntu_19_amd64_is_unsupported() {
        let err = package_url(&ubuntu("x86_64", 19), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn ubuntu_16_amd64_is_unsupported() {
        let err = package_url(&ubuntu("x86_64", 16), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn ubuntu_without_parsable_version_is_unsupported() {
        let host = linux("x86_64").with_distro("ubuntu", "Ubuntu", None, None);
        let err = package_url(&host, ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn non_ubuntu_amd64_has_no_package() {
        let host = linux("x86_64").with_distro("fedora", "Fedora Linux 38", Some(38), None);
        let err = package_url(&host, ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
        assert!(err.to_string().contains("Fedora Linux 38"));
    }

    #[test]
    fn amd64_without_distro_info_has_no_package() {
        let err = package_url(&linux("x86_64"), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
    }

    #[test]
    fn ubuntu_1804_aarch64_uses_fixed_url() {
        let url = package_url(&ubuntu("aarch64", 18), ASSETS).unwrap();
        assert!(url.ends_with("qt5-install-5.15.2-ubuntu-18.04-aarch64_test.tar.xz"));
        assert!(!url.contains(ASSETS));
    }

    #[test]
    fn ubuntu_20_aarch64_has_no_package() {
        let err = package_url(&ubuntu("aarch64", 20), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
    }

    #[test]
    fn ubuntu_19_aarch64_is_unsupported() {
        let err = package_url(&ubuntu("aarch64", 19), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn debian_10_aarch64_uses_fixed_url() {
        let url = package_url(&debian("aarch64", 10), ASSETS).unwrap();
        assert!(url.ends_with("qt5-install-5.15.2-debian-10-aarch64.tar.xz"));
    }

    #[test]
    fn debian_11_aarch64_has_no_package() {
        let err = package_url(&debian("aarch64", 11), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
    }

    #[test]
    fn debian_9_aarch64_is_unsupported() {
        let err = package_url(&debian("aarch64", 9), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn other_distro_aarch64_has_no_package() {
        let host = linux("aarch64").with_distro("arch", "Arch Linux ARM", None, None);
        let err = package_url(&host, ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::NoPackageAvailable { .. }));
    }

    #[test]
    fn unknown_architecture_is_fatal() {
        let err = package_url(&ubuntu("riscv64", 18), ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnknownArchitecture { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_operating_system_is_fatal() {
        let host = HostInfo::new(HostOs::Other, "x86_64").with_os_name("freebsd");
        let err = package_url(&host, ASSETS).unwrap_err();
        assert!(matches!(err, QtPrepError::UnknownOperatingSystem { .. }));
        assert!(err.to_string().contains("freebsd"));
    }

    #[test]
    fn guided_failures_have_distinct_exit_codes() {
        let no_pkg = package_url(&ubuntu("x86_64", 22), ASSETS).unwrap_err();
        let unsupported = package_url(&ubuntu("x86_64", 19), ASSETS).unwrap_err();
        assert_eq!(no_pkg.exit_code(), 2);
        assert_eq!(unsupported.exit_code(), 3);
    }
}
