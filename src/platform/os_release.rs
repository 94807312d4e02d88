//! `/etc/os-release` parsing.

use std::fs;

use super::DistroInfo;

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Read the distribution identity of the running system.
pub(crate) fn read() -> Option<DistroInfo> {
    let content = fs::read_to_string(OS_RELEASE_PATH).ok()?;
    parse(&content)
}

/// Parse os-release content. `None` when no ID field is present.
pub(crate) fn parse(content: &str) -> Option<DistroInfo> {
    let mut id = None;
    let mut pretty_name = None;
    let mut version_id = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = unquote(value);

        match key.trim() {
            "ID" => id = Some(value),
            "PRETTY_NAME" => pretty_name = Some(value),
            "VERSION_ID" => version_id = Some(value),
            _ => {}
        }
    }

    let (major, minor) = version_id
        .as_deref()
        .map(parse_version)
        .unwrap_or((None, None));

    Some(DistroInfo {
        id: id?,
        pretty_name: pretty_name.unwrap_or_default(),
        major,
        minor,
    })
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

fn parse_version(version: &str) -> (Option<u32>, Option<u32>) {
    let mut parts = version.split('.');
    let major = parts.next().and_then(|p| p.parse().ok());
    let minor = parts.next().and_then(|p| p.parse().ok());
    (major, minor)
}
