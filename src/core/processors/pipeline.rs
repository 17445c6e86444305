use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};

use super::classpath::get_classpath_separator;
use super::outputs::verify_outputs;
use super::profile::InstallProfile;
use super::runner::{CompletionPolicy, JavaProcessRunner, ProcessRunner};
use super::stage::{build_stage_command, Stage, StageContext};

/// What happens to the extracted client patch when an install fails.
///
/// Each Forge read extracts the patch under a fresh name, so a patch kept by
/// `KeepOnFailure` is never reused and repeated failures leave one file each
/// in the temp dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Removed after the last stage only; a failed run leaves it in place.
    #[default]
    KeepOnFailure,
    /// Removed whether the run succeeded or not.
    Always,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub completion: CompletionPolicy,
    pub cleanup: CleanupPolicy,
    pub verify_outputs: bool,
    pub classpath_separator: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            completion: CompletionPolicy::default(),
            cleanup: CleanupPolicy::default(),
            verify_outputs: false,
            classpath_separator: get_classpath_separator().to_string(),
        }
    }
}

/// Runs Forge's four client processors one after another.
pub struct InstallerPipeline {
    profile: InstallProfile,
    libraries_root: PathBuf,
    common_root: PathBuf,
    minecraft_version: String,
    temp_artifact: PathBuf,
    options: PipelineOptions,
}

impl InstallerPipeline {
    pub fn new(
        profile: InstallProfile,
        libraries_root: &Path,
        common_root: &Path,
        minecraft_version: &str,
        temp_artifact: &Path,
    ) -> LauncherResult<Self> {
        let client_processors = profile.client_processors().len();
        if client_processors != Stage::ORDER.len() {
            return Err(LauncherError::UndefinedInstallProfile(format!(
                "expected {} client processors, found {}",
                Stage::ORDER.len(),
                client_processors
            )));
        }

        Ok(Self {
            profile,
            libraries_root: libraries_root.to_path_buf(),
            common_root: common_root.to_path_buf(),
            minecraft_version: minecraft_version.to_string(),
            temp_artifact: temp_artifact.to_path_buf(),
            options: PipelineOptions::default(),
        })
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn temp_artifact(&self) -> &Path {
        &self.temp_artifact
    }

    /// Run every stage, then remove the temporary client patch.
    pub async fn run(&self, runner: &dyn ProcessRunner) -> LauncherResult<()> {
        let result = self.run_stages(runner).await;

        if result.is_ok() || self.options.cleanup == CleanupPolicy::Always {
            if let Err(e) = remove_temp_artifact(&self.temp_artifact).await {
                if result.is_ok() {
                    return Err(e);
                }
                warn!("Failed to remove {:?}: {}", self.temp_artifact, e);
            }
        } else {
            warn!(
                "Install failed, keeping {:?} on disk",
                self.temp_artifact
            );
        }

        result
    }

    async fn run_stages(&self, runner: &dyn ProcessRunner) -> LauncherResult<()> {
        let ctx = StageContext {
            profile: &self.profile,
            libraries_root: &self.libraries_root,
            common_root: &self.common_root,
            minecraft_version: &self.minecraft_version,
            temp_artifact: &self.temp_artifact,
            classpath_separator: &self.options.classpath_separator,
        };

        for (stage, processor) in Stage::ORDER.into_iter().zip(self.profile.client_processors()) {
            // Built only once the previous process is gone: its outputs are this stage's inputs.
            let command = build_stage_command(stage, processor, &ctx)?;

            info!("Running Forge processor {} ({})", stage, processor.jar);
            let exit = runner.run(&command).await?;
            self.options.completion.check(stage, exit)?;

            if self.options.verify_outputs && !processor.outputs.is_empty() {
                verify_outputs(&self.profile, processor, &self.libraries_root).await?;
            }
        }

        info!("Forge processors finished for {}", self.minecraft_version);
        Ok(())
    }
}

/// Remove the temporary client patch. A missing file is not an error.
pub async fn remove_temp_artifact(path: &Path) -> LauncherResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LauncherError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Run the processor chain with default options under `java` from `PATH`.
pub async fn install(
    profile: &InstallProfile,
    libraries_root: &Path,
    common_root: &Path,
    minecraft_version: &str,
    temp_artifact: &Path,
) -> LauncherResult<()> {
    let runner = JavaProcessRunner::new("java").with_working_dir(libraries_root);
    InstallerPipeline::new(
        profile.clone(),
        libraries_root,
        common_root,
        minecraft_version,
        temp_artifact,
    )?
    .run(&runner)
    .await
}
