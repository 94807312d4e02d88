//! Host platform facts.
//!
//! The provisioner only ever looks at plain data gathered here: the OS
//! family, the CPU architecture string, and (on Linux) the distribution
//! identity from `/etc/os-release`. Tests construct [`HostInfo`] values
//! directly instead of probing the machine they run on.

mod os_release;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Darwin,
    Linux,
    Other,
}

impl HostOs {
    /// Map a `std::env::consts::OS` style name to a family.
    pub fn from_name(name: &str) -> Self {
        match name {
            "windows" => HostOs::Windows,
            "macos" => HostOs::Darwin,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }
}

/// Linux distribution identity from `/etc/os-release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroInfo {
    /// Machine-readable id (`ubuntu`, `debian`, ...).
    pub id: String,

    /// Human-readable name, used in error messages.
    pub pretty_name: String,

    /// Major version, `None` when VERSION_ID is absent or unparsable.
    pub major: Option<u32>,

    /// Minor version, when present.
    pub minor: Option<u32>,
}

impl DistroInfo {
    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.id
        } else {
            &self.pretty_name
        }
    }
}

/// Read-only facts about the host this build runs on.
#[derive(Debug, Clone)]
pub struct HostInfo {
    /// OS family.
    pub os: HostOs,

    /// Raw OS name, kept for error messages about unknown systems.
    pub os_name: String,

    /// CPU architecture (`x86_64`, `aarch64`, ...).
    pub arch: String,

    /// Distribution identity, Linux only.
    pub distro: Option<DistroInfo>,
}

impl HostInfo {
    /// Gather facts about the machine we are running on.
    pub fn detect() -> Self {
        let os_name = std::env::consts::OS;
        let os = HostOs::from_name(os_name);
        let distro = if os == HostOs::Linux {
            os_release::read()
        } else {
            None
        };

        Self {
            os,
            os_name: os_name.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            distro,
        }
    }

    /// Create a host descriptor with no distro information.
    pub fn new(os: HostOs, arch: &str) -> Self {
        let os_name = match os {
            HostOs::Windows => "windows",
            HostOs::Darwin => "macos",
            HostOs::Linux => "linux",
            HostOs::Other => "unknown",
        };

        Self {
            os,
            os_name: os_name.to_string(),
            arch: arch.to_string(),
            distro: None,
        }
    }

    /// Override the raw OS name.
    pub fn with_os_name(mut self, name: &str) -> Self {
        self.os_name = name.to_string();
        self
    }

    /// Attach distribution identity.
    pub fn with_distro(
        mut self,
        id: &str,
        pretty_name: &str,
        major: Option<u32>,
        minor: Option<u32>,
    ) -> Self {
        self.distro = Some(DistroInfo {
            id: id.to_string(),
            pretty_name: pretty_name.to_string(),
            major,
            minor,
        });
        self
    }

    /// Distribution display name, for messages about missing packages.
    pub fn distro_name(&self) -> String {
        self.distro
            .as_ref()
            .map(|d| d.name().to_string())
            .unwrap_or_else(|| format!("an unidentified {} system", self.os_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_os_from_name() {
        assert_eq!(HostOs::from_name("windows"), HostOs::Windows);
        assert_eq!(HostOs::from_name("macos"), HostOs::Darwin);
        assert_eq!(HostOs::from_name("linux"), HostOs::Linux);
        assert_eq!(HostOs::from_name("freebsd"), HostOs::Other);
    }

    #[test]
    fn detect_returns_consistent_facts() {
        let host = HostInfo::detect();
        assert_eq!(host.os, HostOs::from_name(&host.os_name));
        assert!(!host.arch.is_empty());
    }

    #[test]
    fn distro_name_prefers_pretty_name() {
        let host = HostInfo::new(HostOs::Linux, "x86_64").with_distro(
            "ubuntu",
            "Ubuntu 18.04.6 LTS",
            Some(18),
            Some(4),
        );
        assert_eq!(host.distro_name(), "Ubuntu 18.04.6 LTS");
    }

    #[test]
    fn distro_name_falls_back_to_id() {
        let host = HostInfo::new(HostOs::Linux, "x86_64").with_distro("debian", "", Some(10), None);
        assert_eq!(host.distro_name(), "debian");
    }

    #[test]
    fn distro_name_without_distro_mentions_os() {
        let host = HostInfo::new(HostOs::Linux, "x86_64");
        assert!(host.distro_name().contains("linux"));
    }
}
