use std::path::PathBuf;

use super::artifact::MavenArtifact;
use crate::core::error::{LauncherError, LauncherResult};

/// Filename template applied when turning a coordinate into a library path.
///
/// Install profiles describe their intermediate files with coordinates whose
/// on-disk names do not always follow the plain Maven convention, so the
/// template depends on what the coordinate stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLayout {
    /// `<artifact>-<version>-<classifier>.<ext>`, extension defaulting to `txt`.
    Mappings,
    /// `<artifact>-<version>-<classifier>.jar`, any extension is ignored.
    Classified,
    /// `<artifact>-<version>[-<classifier>].<ext>`, the Maven default.
    Standard,
}

impl PathLayout {
    /// Path of `artifact` relative to the libraries root under this template.
    pub fn relative_path(self, artifact: &MavenArtifact) -> LauncherResult<PathBuf> {
        let filename = match self {
            PathLayout::Standard => artifact.filename(),
            PathLayout::Mappings => format!(
                "{}-{}-{}.{}",
                artifact.artifact_id,
                artifact.version,
                required_classifier(artifact)?,
                artifact.extension.as_deref().unwrap_or("txt")
            ),
            PathLayout::Classified => format!(
                "{}-{}-{}.jar",
                artifact.artifact_id,
                artifact.version,
                required_classifier(artifact)?
            ),
        };

        Ok(artifact.version_dir().join(filename))
    }
}

fn required_classifier(artifact: &MavenArtifact) -> LauncherResult<&str> {
    artifact
        .classifier
        .as_deref()
        .ok_or_else(|| LauncherError::UnresolvedCoordinate(format!("{artifact} (missing classifier)")))
}
