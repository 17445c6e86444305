use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

use super::descriptor::{
    FabricDescriptor, ForgeDescriptor, LoaderArguments, LoaderCommon, ModLoaderDescriptor,
};
use super::{LoaderFamily, LoaderId};

/// Everything a Forge installer provides.
#[derive(Debug, Clone)]
pub struct ForgeAssets {
    pub main_class: String,
    pub arguments: LoaderArguments,
    pub libraries: Vec<String>,
    pub is_install: bool,
    pub version_json: serde_json::Value,
    pub install_profile: serde_json::Value,
    pub client_patch: Option<PathBuf>,
}

/// Everything a Fabric loader profile provides.
#[derive(Debug, Clone)]
pub struct FabricAssets {
    pub main_class: String,
    pub arguments: LoaderArguments,
    pub libraries: Vec<String>,
    pub version_json: serde_json::Value,
}

#[async_trait]
pub trait ForgeHandler: Send + Sync {
    /// `Ok(None)` when nothing is available for this loader version.
    async fn forge_assets(&self, id: &LoaderId) -> LauncherResult<Option<ForgeAssets>>;
}

#[async_trait]
pub trait FabricHandler: Send + Sync {
    /// `Ok(None)` when nothing is available for this loader version.
    async fn fabric_assets(&self, id: &LoaderId) -> LauncherResult<Option<FabricAssets>>;
}

/// Routes a loader identifier to its family handler and normalizes the result.
pub struct LoaderDispatcher<F, B> {
    forge: F,
    fabric: B,
}

impl<F: ForgeHandler, B: FabricHandler> LoaderDispatcher<F, B> {
    pub fn new(forge: F, fabric: B) -> Self {
        Self { forge, fabric }
    }

    pub async fn resolve(&self, loader_id: &str) -> LauncherResult<ModLoaderDescriptor> {
        let id = LoaderId::parse(loader_id)?;
        info!("Resolving {} loader {}", id.family, id.version);

        let descriptor = match id.family {
            LoaderFamily::Forge => {
                let assets = self
                    .forge
                    .forge_assets(&id)
                    .await?
                    .ok_or_else(|| LauncherError::NullLoaderAssets(id.raw.clone()))?;

                ModLoaderDescriptor::Forge(ForgeDescriptor {
                    common: LoaderCommon {
                        version: id.version,
                        arguments: assets.arguments,
                        main_class: assets.main_class,
                        libraries: assets.libraries,
                    },
                    is_install: assets.is_install,
                    version_json_object: assets.version_json,
                    install_profile: assets.install_profile,
                    client_patch: assets.client_patch,
                })
            }
            LoaderFamily::Fabric => {
                let assets = self
                    .fabric
                    .fabric_assets(&id)
                    .await?
                    .ok_or_else(|| LauncherError::NullLoaderAssets(id.raw.clone()))?;

                ModLoaderDescriptor::Fabric(FabricDescriptor {
                    common: LoaderCommon {
                        version: id.version,
                        arguments: assets.arguments,
                        main_class: assets.main_class,
                        libraries: assets.libraries,
                    },
                    version_json_object: assets.version_json,
                })
            }
        };

        Ok(descriptor)
    }
}
