// ─── Loader setup ───
// Resolves a loader identifier and, for Forge installs that still need it,
// runs the processor chain before handing the descriptor to the launch flow.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::loaders::{
    FabricProfileHandler, ForgeDescriptor, ForgeInstallerHandler, LoaderDispatcher,
    ModLoaderDescriptor,
};
use crate::core::processors::{
    remove_temp_artifact, CleanupPolicy, InstallProfile, InstallerPipeline, JavaProcessRunner,
    ProcessRunner,
};
use crate::core::state::AppState;

/// Resolve `loader_id` and finish its installation with the configured Java.
pub async fn prepare(state: &AppState, loader_id: &str) -> LauncherResult<ModLoaderDescriptor> {
    let runner = JavaProcessRunner::new(state.java_bin()).with_working_dir(&state.libraries_dir());
    prepare_with_runner(state, loader_id, &runner).await
}

pub async fn prepare_with_runner(
    state: &AppState,
    loader_id: &str,
    runner: &dyn ProcessRunner,
) -> LauncherResult<ModLoaderDescriptor> {
    let dispatcher = LoaderDispatcher::new(
        ForgeInstallerHandler::new(
            &state.installers_dir(),
            &state.libraries_dir(),
            &state.temp_dir(),
        ),
        FabricProfileHandler::new(&state.versions_dir()),
    );

    let descriptor = dispatcher.resolve(loader_id).await?;

    match &descriptor {
        ModLoaderDescriptor::Forge(forge) if forge.is_install => {
            run_forge_processors(state, forge, runner).await?;
        }
        ModLoaderDescriptor::Forge(forge) => {
            debug!("Forge {} already patched", forge.common.version);
        }
        ModLoaderDescriptor::Fabric(fabric) => {
            debug!("Fabric {} has no processors", fabric.common.version);
        }
    }

    Ok(descriptor)
}

async fn run_forge_processors(
    state: &AppState,
    forge: &ForgeDescriptor,
    runner: &dyn ProcessRunner,
) -> LauncherResult<()> {
    let client_patch = forge.client_patch.as_deref().ok_or_else(|| {
        LauncherError::UndefinedInstallProfile("no client patch extracted from installer".into())
    })?;

    let result = run_pipeline(state, forge, client_patch, runner).await;

    // Profile and pipeline setup can fail before `run` gets to clean up.
    if result.is_err() && state.settings.temp_cleanup == CleanupPolicy::Always {
        if let Err(e) = remove_temp_artifact(client_patch).await {
            warn!("Failed to remove {:?}: {}", client_patch, e);
        }
    }

    result
}

async fn run_pipeline(
    state: &AppState,
    forge: &ForgeDescriptor,
    client_patch: &Path,
    runner: &dyn ProcessRunner,
) -> LauncherResult<()> {
    let profile = InstallProfile::from_value(forge.install_profile.clone())?;

    // Forge versions are `<minecraft>-<forge>` when the profile does not say.
    let minecraft_version = match &profile.minecraft {
        Some(version) => version.clone(),
        None => forge
            .common
            .version
            .split('-')
            .next()
            .unwrap_or(&forge.common.version)
            .to_string(),
    };

    info!(
        "Installing Forge {} for Minecraft {}",
        forge.common.version, minecraft_version
    );

    InstallerPipeline::new(
        profile,
        &state.libraries_dir(),
        state.common_dir(),
        &minecraft_version,
        client_patch,
    )?
    .with_options(state.pipeline_options())
    .run(runner)
    .await
}
