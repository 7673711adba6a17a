//! Parsers for command output lines

/// Home directory entries that are not user accounts
pub const EXCLUDED_USERS: [&str; 2] = ["Guest", "Shared"];

/// Find the value of the first `"<label>: <value>"` line whose label contains `key`
///
/// Lines without a `": "` separator (section headers, blank lines) are skipped.
#[must_use]
pub fn labeled_value(lines: &[String], key: &str) -> Option<String> {
    lines.iter().find_map(|line| {
        let (label, value) = line.split_once(": ")?;
        label.contains(key).then(|| value.trim().to_string())
    })
}

/// Join the values of `sw_vers` style `"<label>: <value>"` lines with single spaces
///
/// Only lines that split into exactly two parts on `':'` contribute.
#[must_use]
pub fn software_version(lines: &[String]) -> String {
    lines
        .iter()
        .filter_map(|line| {
            let mut parts = line.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(_), Some(value), None) => Some(value.trim()),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop the guest and shared entries from a home directory listing, keeping order
#[must_use]
pub fn users(listing: &[String]) -> Vec<String> {
    listing
        .iter()
        .filter(|entry| !EXCLUDED_USERS.contains(&entry.as_str()))
        .cloned()
        .collect()
}
