use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

use super::profile::{InstallProfile, Processor};

/// Platform separator for `-cp` values.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Resolve a library name to its jar under `libraries_root`.
///
/// Names are matched exactly against the profile's `libraries`; the profile's
/// declared `downloads.artifact.path` is used as-is.
pub fn resolve_library(
    profile: &InstallProfile,
    name: &str,
    libraries_root: &Path,
) -> LauncherResult<PathBuf> {
    let library = profile
        .library(name)
        .ok_or_else(|| LauncherError::UnmatchedLibrary(name.to_string()))?;
    let relative = library.artifact_path().ok_or_else(|| {
        LauncherError::UndefinedInstallProfile(format!("library {} has no artifact path", name))
    })?;
    Ok(libraries_root.join(relative))
}

/// Build the processor's `-cp` value: processor jar first, then its declared
/// classpath in order, each path once.
pub fn build_processor_classpath(
    profile: &InstallProfile,
    processor: &Processor,
    libraries_root: &Path,
    separator: &str,
) -> LauncherResult<String> {
    let mut entries: Vec<String> = Vec::with_capacity(processor.classpath.len() + 1);

    for name in std::iter::once(&processor.jar).chain(processor.classpath.iter()) {
        let path = resolve_library(profile, name, libraries_root)?
            .to_string_lossy()
            .to_string();
        if !entries.contains(&path) {
            entries.push(path);
        }
    }

    Ok(entries.join(separator))
}
