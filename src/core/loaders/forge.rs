use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::descriptor::LoaderArguments;
use super::dispatcher::{ForgeAssets, ForgeHandler};
use super::LoaderId;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::processors::data::resolve_data_key;
use crate::core::processors::InstallProfile;

const DEFAULT_CLIENT_PATCH: &str = "data/client.lzma";

/// Subset of the Forge version JSON (inside the installer as `version.json`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForgeVersionJson {
    main_class: String,
    #[serde(default)]
    libraries: Vec<ForgeLibrary>,
    #[serde(default)]
    arguments: Option<ForgeArguments>,
    /// Pre-1.13 versions carry a single argument string instead.
    #[serde(default)]
    minecraft_arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForgeLibrary {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForgeArguments {
    #[serde(default)]
    game: Vec<serde_json::Value>,
    #[serde(default)]
    jvm: Vec<serde_json::Value>,
}

impl ForgeVersionJson {
    fn loader_arguments(&self) -> LoaderArguments {
        // Rule-gated entries are objects; only plain strings apply unconditionally.
        let strings = |values: &[serde_json::Value]| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect::<Vec<_>>()
        };

        match (&self.arguments, &self.minecraft_arguments) {
            (Some(args), _) => LoaderArguments {
                jvm: strings(&args.jvm),
                game: strings(&args.game),
            },
            (None, Some(legacy)) => LoaderArguments {
                jvm: Vec::new(),
                game: legacy.split_whitespace().map(str::to_string).collect(),
            },
            (None, None) => LoaderArguments::default(),
        }
    }
}

/// Reads Forge installer jars already present in the launcher's installer directory.
pub struct ForgeInstallerHandler {
    installers_dir: PathBuf,
    libraries_root: PathBuf,
    temp_dir: PathBuf,
}

impl ForgeInstallerHandler {
    pub fn new(installers_dir: &Path, libraries_root: &Path, temp_dir: &Path) -> Self {
        Self {
            installers_dir: installers_dir.to_path_buf(),
            libraries_root: libraries_root.to_path_buf(),
            temp_dir: temp_dir.to_path_buf(),
        }
    }

    pub fn installer_path(&self, version: &str) -> PathBuf {
        self.installers_dir
            .join(format!("forge-{}-installer.jar", version))
    }
}

#[async_trait]
impl ForgeHandler for ForgeInstallerHandler {
    async fn forge_assets(&self, id: &LoaderId) -> LauncherResult<Option<ForgeAssets>> {
        let installer_path = self.installer_path(&id.version);
        if !installer_path.exists() {
            debug!("No Forge installer at {:?}", installer_path);
            return Ok(None);
        }

        let installer_bytes =
            tokio::fs::read(&installer_path)
                .await
                .map_err(|e| LauncherError::Io {
                    path: installer_path.clone(),
                    source: e,
                })?;

        let contents = read_installer(&installer_bytes)?;
        let version_json: ForgeVersionJson =
            serde_json::from_value(contents.version_json.clone())?;
        let is_install = needs_processing(&contents.install_profile, &self.libraries_root)?;

        // Unique per read; a patch kept after a failed run is not picked up again.
        let client_patch = if is_install {
            let target = self.temp_dir.join(format!("{}-client.lzma", Uuid::new_v4()));
            extract_client_patch(&installer_bytes, &contents.install_profile, &target)?;
            Some(target)
        } else {
            None
        };

        info!(
            "Read Forge installer {} (install required: {})",
            id.version, is_install
        );

        Ok(Some(ForgeAssets {
            main_class: version_json.main_class.clone(),
            arguments: version_json.loader_arguments(),
            libraries: version_json
                .libraries
                .iter()
                .map(|lib| lib.name.clone())
                .collect(),
            is_install,
            version_json: contents.version_json,
            install_profile: contents.install_profile,
            client_patch,
        }))
    }
}

struct InstallerContents {
    install_profile: serde_json::Value,
    version_json: serde_json::Value,
}

fn read_installer(installer_bytes: &[u8]) -> LauncherResult<InstallerContents> {
    let cursor = std::io::Cursor::new(installer_bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let install_profile: serde_json::Value = {
        let file = archive.by_name("install_profile.json").map_err(|e| {
            LauncherError::UndefinedInstallProfile(format!("missing install_profile.json: {}", e))
        })?;
        serde_json::from_reader(file)?
    };

    let version_json: serde_json::Value = {
        let file = archive.by_name("version.json").map_err(|e| {
            LauncherError::UndefinedInstallProfile(format!("missing version.json: {}", e))
        })?;
        serde_json::from_reader(file)?
    };

    Ok(InstallerContents {
        install_profile,
        version_json,
    })
}

/// Processors have to run when the profile has client processors and the
/// patched client jar is not on disk yet.
///
/// Legacy installers carry no `processors` at all. Any other profile has to
/// validate.
fn needs_processing(
    install_profile: &serde_json::Value,
    libraries_root: &Path,
) -> LauncherResult<bool> {
    if install_profile.get("processors").is_none() {
        return Ok(false);
    }

    let profile = InstallProfile::from_value(install_profile.clone())?;
    if profile.client_processors().is_empty() {
        return Ok(false);
    }

    Ok(match resolve_data_key(&profile, "PATCHED", libraries_root) {
        Ok(patched) => !patched.exists(),
        Err(_) => true,
    })
}

fn extract_client_patch(
    installer_bytes: &[u8],
    install_profile: &serde_json::Value,
    target: &Path,
) -> LauncherResult<()> {
    let entry_name = install_profile
        .pointer("/data/BINPATCH/client")
        .and_then(|v| v.as_str())
        .map(|v| v.trim_start_matches('/'))
        .unwrap_or(DEFAULT_CLIENT_PATCH);

    let cursor = std::io::Cursor::new(installer_bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut source_file = archive.by_name(entry_name).map_err(|e| {
        LauncherError::UndefinedInstallProfile(format!(
            "installer has no client patch {}: {}",
            entry_name, e
        ))
    })?;
    let mut bytes = Vec::new();
    source_file.read_to_end(&mut bytes)?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| LauncherError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(target, bytes).map_err(|e| LauncherError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;

    use zip::write::SimpleFileOptions;

    pub fn forge_version_json() -> serde_json::Value {
        serde_json::json!({
            "id": "1.16.5-forge-36.2.0",
            "inheritsFrom": "1.16.5",
            "mainClass": "cpw.mods.modlauncher.Launcher",
            "arguments": {
                "game": ["--launchTarget", "fmlclient", { "rules": [], "value": "--demo" }],
                "jvm": []
            },
            "libraries": [
                { "name": "net.minecraftforge:forge:1.16.5-36.2.0" },
                { "name": "cpw.mods:modlauncher:8.0.9" }
            ]
        })
    }

    /// Write an installer jar holding the given profile, version JSON and client patch.
    pub fn write_installer(
        path: &Path,
        install_profile: &serde_json::Value,
        version_json: &serde_json::Value,
    ) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        zip.start_file("install_profile.json", options).unwrap();
        zip.write_all(install_profile.to_string().as_bytes()).unwrap();
        zip.start_file("version.json", options).unwrap();
        zip.write_all(version_json.to_string().as_bytes()).unwrap();
        zip.start_file("data/client.lzma", options).unwrap();
        zip.write_all(b"client binpatches").unwrap();
        zip.finish().unwrap();
    }
}
