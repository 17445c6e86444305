pub mod descriptor;
pub mod dispatcher;
pub mod fabric;
pub mod forge;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};

pub use descriptor::{
    FabricDescriptor, ForgeDescriptor, LoaderArguments, LoaderCommon, ModLoaderDescriptor,
};
pub use dispatcher::{FabricAssets, FabricHandler, ForgeAssets, ForgeHandler, LoaderDispatcher};
pub use fabric::FabricProfileHandler;
pub use forge::ForgeInstallerHandler;

/// Supported mod loaders. Closed set: adding one means a new variant here,
/// a handler and a descriptor variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoaderFamily {
    Forge,
    Fabric,
}

impl std::fmt::Display for LoaderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderFamily::Forge => write!(f, "forge"),
            LoaderFamily::Fabric => write!(f, "fabric"),
        }
    }
}

/// A loader identifier such as `forge-1.16.5-36.2.0` split into family and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderId {
    pub family: LoaderFamily,
    /// Everything after the first `-`.
    pub version: String,
    pub raw: String,
}

impl LoaderId {
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let unknown = || LauncherError::UnknownLoaderType(raw.to_string());

        let (family, version) = raw.split_once('-').ok_or_else(unknown)?;
        let family = match family {
            "forge" => LoaderFamily::Forge,
            "fabric" => LoaderFamily::Fabric,
            _ => return Err(unknown()),
        };
        if version.is_empty() {
            return Err(unknown());
        }

        Ok(Self {
            family,
            version: version.to_string(),
            raw: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_family_from_first_segment() {
        let id = LoaderId::parse("forge-1.16.5-36.2.0").unwrap();
        assert_eq!(id.family, LoaderFamily::Forge);
        assert_eq!(id.version, "1.16.5-36.2.0");

        let id = LoaderId::parse("fabric-loader-0.16.10-1.21.1").unwrap();
        assert_eq!(id.family, LoaderFamily::Fabric);
        assert_eq!(id.version, "loader-0.16.10-1.21.1");
    }

    #[test]
    fn rejects_unknown_or_incomplete_identifiers() {
        for raw in ["quilt-1.0", "neoforge-21.1.1", "forge", "forge-", "Forge-47.2.0", ""] {
            assert!(
                matches!(LoaderId::parse(raw), Err(LauncherError::UnknownLoaderType(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
