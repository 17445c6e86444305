use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::descriptor::LoaderArguments;
use super::dispatcher::{FabricAssets, FabricHandler};
use super::LoaderId;
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricProfile {
    pub id: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub libraries: Vec<FabricLibrary>,
    pub arguments: Option<FabricArguments>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FabricLibrary {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FabricArguments {
    #[serde(default)]
    pub jvm: Vec<String>,
    #[serde(default)]
    pub game: Vec<String>,
}

/// Reads Fabric loader profiles stored as `versions/<id>/<id>.json`.
pub struct FabricProfileHandler {
    versions_dir: PathBuf,
}

impl FabricProfileHandler {
    pub fn new(versions_dir: &Path) -> Self {
        Self {
            versions_dir: versions_dir.to_path_buf(),
        }
    }

    pub fn profile_path(&self, id: &LoaderId) -> PathBuf {
        self.versions_dir
            .join(&id.raw)
            .join(format!("{}.json", id.raw))
    }

    fn ensure_loader_artifact(libraries: &mut Vec<String>, loader_version: &str) {
        let loader_coord = format!("net.fabricmc:fabric-loader:{}", loader_version);
        if libraries.iter().any(|lib| lib == &loader_coord) {
            return;
        }
        libraries.push(loader_coord);
    }
}

/// Loader version inside an identifier like `fabric-loader-0.16.10-1.21.1`.
fn loader_version(id: &LoaderId) -> &str {
    let rest = id.version.strip_prefix("loader-").unwrap_or(&id.version);
    rest.split('-').next().unwrap_or(rest)
}

#[async_trait]
impl FabricHandler for FabricProfileHandler {
    async fn fabric_assets(&self, id: &LoaderId) -> LauncherResult<Option<FabricAssets>> {
        let profile_path = self.profile_path(id);
        if !profile_path.exists() {
            debug!("No Fabric profile at {:?}", profile_path);
            return Ok(None);
        }

        let raw = tokio::fs::read_to_string(&profile_path)
            .await
            .map_err(|e| LauncherError::Io {
                path: profile_path.clone(),
                source: e,
            })?;
        let version_json: serde_json::Value = serde_json::from_str(&raw)?;
        let profile: FabricProfile = serde_json::from_value(version_json.clone())?;

        if profile.main_class.is_empty() {
            return Err(LauncherError::Other(format!(
                "Fabric profile {} missing mainClass",
                id.raw
            )));
        }

        let mut libraries: Vec<String> = profile.libraries.iter().map(|l| l.name.clone()).collect();
        Self::ensure_loader_artifact(&mut libraries, loader_version(id));

        let arguments = match profile.arguments {
            Some(args) => LoaderArguments {
                jvm: args.jvm,
                game: args.game,
            },
            None => LoaderArguments::default(),
        };

        info!("Read Fabric profile {}", id.raw);

        Ok(Some(FabricAssets {
            main_class: profile.main_class,
            arguments,
            libraries,
            version_json,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_loader_artifact_adds_fabric_loader_coordinate() {
        let mut libs = vec!["net.fabricmc:intermediary:1.21.1".to_string()];

        FabricProfileHandler::ensure_loader_artifact(&mut libs, "0.16.10");

        assert!(libs
            .iter()
            .any(|lib| lib == "net.fabricmc:fabric-loader:0.16.10"));
    }

    #[test]
    fn ensure_loader_artifact_keeps_existing_coordinate_unique() {
        let mut libs = vec!["net.fabricmc:fabric-loader:0.16.10".to_string()];

        FabricProfileHandler::ensure_loader_artifact(&mut libs, "0.16.10");

        assert_eq!(
            libs.iter()
                .filter(|lib| lib.as_str() == "net.fabricmc:fabric-loader:0.16.10")
                .count(),
            1
        );
    }

    #[test]
    fn loader_version_handles_both_identifier_shapes() {
        let full = LoaderId::parse("fabric-loader-0.16.10-1.21.1").unwrap();
        assert_eq!(loader_version(&full), "0.16.10");
        let short = LoaderId::parse("fabric-0.16.10").unwrap();
        assert_eq!(loader_version(&short), "0.16.10");
    }

    #[tokio::test]
    async fn reads_profile_from_versions_dir() {
        let root = std::env::temp_dir().join(format!("fabric-handler-test-{}", uuid::Uuid::new_v4()));
        let handler = FabricProfileHandler::new(&root);
        let id = LoaderId::parse("fabric-loader-0.16.10-1.21.1").unwrap();
        let path = handler.profile_path(&id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            serde_json::json!({
                "id": "fabric-loader-0.16.10-1.21.1",
                "inheritsFrom": "1.21.1",
                "mainClass": "net.fabricmc.loader.impl.launch.knot.KnotClient",
                "arguments": { "game": [], "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "] },
                "libraries": [
                    { "name": "net.fabricmc:intermediary:1.21.1", "url": "https://maven.fabricmc.net/" }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let assets = handler.fabric_assets(&id).await.unwrap().unwrap();

        assert_eq!(assets.main_class, "net.fabricmc.loader.impl.launch.knot.KnotClient");
        assert_eq!(assets.arguments.jvm.len(), 1);
        assert_eq!(
            assets.libraries,
            vec![
                "net.fabricmc:intermediary:1.21.1".to_string(),
                "net.fabricmc:fabric-loader:0.16.10".to_string()
            ]
        );
        assert_eq!(assets.version_json["inheritsFrom"], "1.21.1");

        let missing = LoaderId::parse("fabric-loader-0.15.0-1.20.1").unwrap();
        assert!(handler.fabric_assets(&missing).await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&root);
    }
}
