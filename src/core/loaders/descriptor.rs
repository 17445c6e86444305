use std::path::PathBuf;

use serde::Serialize;

use super::LoaderFamily;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoaderArguments {
    pub jvm: Vec<String>,
    pub game: Vec<String>,
}

/// Fields every loader provides to the launch flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderCommon {
    pub version: String,
    pub arguments: LoaderArguments,
    pub main_class: String,
    pub libraries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeDescriptor {
    #[serde(flatten)]
    pub common: LoaderCommon,
    /// Processors still have to run before the game can start.
    pub is_install: bool,
    pub version_json_object: serde_json::Value,
    pub install_profile: serde_json::Value,
    /// Client patch extracted from the installer, consumed by binarypatcher.
    #[serde(skip)]
    pub client_patch: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricDescriptor {
    #[serde(flatten)]
    pub common: LoaderCommon,
    pub version_json_object: serde_json::Value,
}

/// What the launcher needs to start a modded game, per loader family.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModLoaderDescriptor {
    Forge(ForgeDescriptor),
    Fabric(FabricDescriptor),
}

impl ModLoaderDescriptor {
    pub fn family(&self) -> LoaderFamily {
        match self {
            ModLoaderDescriptor::Forge(_) => LoaderFamily::Forge,
            ModLoaderDescriptor::Fabric(_) => LoaderFamily::Fabric,
        }
    }

    pub fn common(&self) -> &LoaderCommon {
        match self {
            ModLoaderDescriptor::Forge(forge) => &forge.common,
            ModLoaderDescriptor::Fabric(fabric) => &fabric.common,
        }
    }
}
