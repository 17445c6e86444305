use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::processors::{CleanupPolicy, CompletionPolicy, PipelineOptions};

const APP_DIR_NAME: &str = "ModloaderInstall";
const SETTINGS_FILE: &str = "installer_settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    /// Launcher data directory; the platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    /// Java executable used for processors; `java` from `PATH` when unset.
    pub java_path: Option<PathBuf>,
    pub completion: CompletionPolicy,
    pub temp_cleanup: CleanupPolicy,
    pub verify_outputs: bool,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            java_path: None,
            completion: CompletionPolicy::AnyExit,
            temp_cleanup: CleanupPolicy::KeepOnFailure,
            verify_outputs: false,
        }
    }
}

pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: InstallerSettings,
}

impl AppState {
    /// Load state rooted at `data_dir`.
    ///
    /// Settings come from `settings_path`, or `installer_settings.json` in the
    /// given (or platform) data dir; a missing or unreadable file falls back to
    /// defaults. The data dir is the argument, then the settings' `data_dir`,
    /// then the platform data dir.
    pub fn load(data_dir: Option<PathBuf>, settings_path: Option<&Path>) -> Self {
        let settings_path = settings_path.map(Path::to_path_buf).unwrap_or_else(|| {
            data_dir
                .clone()
                .unwrap_or_else(default_data_dir)
                .join(SETTINGS_FILE)
        });
        let settings = load_settings_from_disk(&settings_path).unwrap_or_default();
        let data_dir = data_dir
            .or_else(|| settings.data_dir.clone())
            .unwrap_or_else(default_data_dir);

        Self { data_dir, settings }
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.data_dir.join("libraries")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.data_dir.join("versions")
    }

    pub fn installers_dir(&self) -> PathBuf {
        self.data_dir.join("installers")
    }

    /// Root holding `versions/<v>/<v>.jar`.
    pub fn common_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir().join(APP_DIR_NAME)
    }

    pub fn java_bin(&self) -> PathBuf {
        self.settings
            .java_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("java"))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            completion: self.settings.completion,
            cleanup: self.settings.temp_cleanup,
            verify_outputs: self.settings.verify_outputs,
            ..PipelineOptions::default()
        }
    }

    pub fn save_settings(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let settings_path = self.data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(settings_path, json)
    }
}

fn load_settings_from_disk(path: &Path) -> Option<InstallerSettings> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring unreadable settings {:?}: {}", path, e);
            None
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> PathBuf {
        std::env::temp_dir().join(format!("settings-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let dir = scratch();
        let state = AppState::load(Some(dir.clone()), None);

        assert_eq!(state.settings.completion, CompletionPolicy::AnyExit);
        assert_eq!(state.settings.temp_cleanup, CleanupPolicy::KeepOnFailure);
        assert_eq!(state.java_bin(), PathBuf::from("java"));
        assert_eq!(state.libraries_dir(), dir.join("libraries"));
    }

    #[test]
    fn partial_settings_file_overrides_given_fields() {
        let dir = scratch();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(SETTINGS_FILE),
            r#"{ "completion": "require_success", "java_path": "/opt/jdk/bin/java" }"#,
        )
        .unwrap();

        let state = AppState::load(Some(dir.clone()), None);

        assert_eq!(state.settings.completion, CompletionPolicy::RequireSuccess);
        assert_eq!(state.settings.temp_cleanup, CleanupPolicy::KeepOnFailure);
        assert_eq!(state.java_bin(), PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(
            state.pipeline_options().completion,
            CompletionPolicy::RequireSuccess
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = scratch();
        let mut state = AppState::load(Some(dir.clone()), None);
        state.settings.temp_cleanup = CleanupPolicy::Always;
        state.settings.verify_outputs = true;
        state.save_settings().unwrap();

        let reloaded = AppState::load(Some(dir.clone()), None);
        assert_eq!(reloaded.settings.temp_cleanup, CleanupPolicy::Always);
        assert!(reloaded.settings.verify_outputs);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn data_dir_comes_from_settings_unless_given() {
        let dir = scratch();
        std::fs::create_dir_all(&dir).unwrap();
        let settings_path = dir.join("custom_settings.json");
        let configured = dir.join("launcher-data");
        std::fs::write(
            &settings_path,
            serde_json::json!({ "data_dir": configured }).to_string(),
        )
        .unwrap();

        let state = AppState::load(None, Some(&settings_path));
        assert_eq!(state.data_dir, configured);
        assert_eq!(state.libraries_dir(), configured.join("libraries"));

        let overridden = AppState::load(Some(dir.join("cli")), Some(&settings_path));
        assert_eq!(overridden.data_dir, dir.join("cli"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
