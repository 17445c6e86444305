use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::{MavenArtifact, PathLayout};

use super::profile::InstallProfile;

/// Layout used for an install-data entry, chosen by its key.
pub fn layout_for_data_key(key: &str) -> PathLayout {
    match key {
        "MAPPINGS" => PathLayout::Mappings,
        "MC_SLIM" | "MC_EXTRA" | "MC_SRG" | "PATCHED" => PathLayout::Classified,
        _ => PathLayout::Standard,
    }
}

/// Strip the braces of a `{KEY}` placeholder.
pub fn placeholder_key(raw: &str) -> LauncherResult<&str> {
    raw.trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|key| !key.is_empty())
        .ok_or_else(|| LauncherError::UnresolvedCoordinate(raw.to_string()))
}

/// Resolve a bracketed coordinate to an absolute path under `libraries_root`.
pub fn resolve_coordinate(
    raw: &str,
    layout: PathLayout,
    libraries_root: &Path,
) -> LauncherResult<PathBuf> {
    let artifact = MavenArtifact::parse_bracketed(raw)?;
    Ok(libraries_root.join(layout.relative_path(&artifact)?))
}

/// Resolve the client value of install-data `key` to a library path.
pub fn resolve_data_key(
    profile: &InstallProfile,
    key: &str,
    libraries_root: &Path,
) -> LauncherResult<PathBuf> {
    let value = profile
        .data_client(key)
        .ok_or_else(|| LauncherError::MissingInstallData(key.to_string()))?;
    resolve_coordinate(value, layout_for_data_key(key), libraries_root)
}

/// Resolve a `{KEY}` placeholder through the profile's install data.
pub fn resolve_placeholder(
    profile: &InstallProfile,
    raw: &str,
    libraries_root: &Path,
) -> LauncherResult<PathBuf> {
    resolve_data_key(profile, placeholder_key(raw)?, libraries_root)
}

/// Literal install-data value such as `'2a9f...'` with its quotes removed.
pub fn data_literal<'a>(profile: &'a InstallProfile, key: &str) -> LauncherResult<&'a str> {
    let value = profile
        .data_client(key)
        .ok_or_else(|| LauncherError::MissingInstallData(key.to_string()))?;
    Ok(value.trim().trim_matches('\''))
}
