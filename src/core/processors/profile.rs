use std::collections::HashMap;

use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};

/// Subset of Forge's `install_profile.json` needed to run the client processors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallProfile {
    /// Target game version, e.g. `1.16.5`.
    #[serde(default)]
    pub minecraft: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub libraries: Vec<ProfileLibrary>,
    #[serde(default)]
    pub processors: Vec<Processor>,
    #[serde(default)]
    pub data: HashMap<String, DataEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileLibrary {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibraryArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Processor {
    #[serde(default)]
    pub sides: Option<Vec<String>>,
    pub jar: String,
    #[serde(default)]
    pub classpath: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// `{"{KEY}": "{KEY_SHA}"}` pairs checked after the processor ran.
    #[serde(default)]
    pub outputs: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataEntry {
    pub client: String,
    #[serde(default)]
    pub server: Option<String>,
}

impl ProfileLibrary {
    /// Relative path of the library jar under the libraries root.
    pub fn artifact_path(&self) -> Option<&str> {
        self.downloads
            .as_ref()
            .and_then(|d| d.artifact.as_ref())
            .map(|a| a.path.as_str())
    }
}

impl Processor {
    pub fn runs_on_client(&self) -> bool {
        match &self.sides {
            Some(sides) => sides.iter().any(|s| s == "client"),
            None => true,
        }
    }
}

impl InstallProfile {
    pub fn from_json(raw: &str) -> LauncherResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Build a profile from an already parsed JSON document.
    ///
    /// The document must carry `libraries`, `processors` and `data`; a
    /// profile missing any of them cannot drive the processor chain.
    pub fn from_value(value: serde_json::Value) -> LauncherResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(LauncherError::UndefinedInstallProfile(
                "install profile is not a JSON object".into(),
            ));
        };

        for key in ["libraries", "processors", "data"] {
            if !obj.contains_key(key) {
                return Err(LauncherError::UndefinedInstallProfile(format!(
                    "missing `{}`",
                    key
                )));
            }
        }

        serde_json::from_value(value).map_err(LauncherError::from)
    }

    /// Processors that apply to the client side, in declared order.
    pub fn client_processors(&self) -> Vec<&Processor> {
        self.processors
            .iter()
            .filter(|p| p.runs_on_client())
            .collect()
    }

    pub fn library(&self, name: &str) -> Option<&ProfileLibrary> {
        self.libraries.iter().find(|lib| lib.name == name)
    }

    pub fn data_client(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|entry| entry.client.as_str())
    }
}
