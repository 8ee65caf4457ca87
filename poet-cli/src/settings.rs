//! Project settings stored next to the project (`poet.json`, or `poet.toml`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use poet::{ExportOptions, ExtensionPolicy, UntranslatedPolicy};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "poet.json";
pub const TOML_SETTINGS_FILE: &str = "poet.toml";
pub const TOKEN_ENV: &str = "POET_TOKEN";
pub const DEFAULT_OUTPUT_FOLDER: &str = "POEditor";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// POEditor API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(rename = "projectID", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,

    /// Service language codes to export.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,

    /// Where `.lproj` folders are written; relative paths are resolved against the project dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<String>,

    #[serde(default, skip_serializing_if = "is_default_policy")]
    pub untranslated: UntranslatedPolicy,

    /// Base name for contexts without a file extension. Unset means such contexts are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,

    /// Token taken from `POET_TOKEN`. Never written back to disk.
    #[serde(skip)]
    pub env_token: Option<String>,
}

fn is_default_policy(policy: &UntranslatedPolicy) -> bool {
    *policy == UntranslatedPolicy::default()
}

impl Settings {
    /// Loads settings from `dir`, preferring `poet.json` over `poet.toml`.
    ///
    /// Missing files give empty settings. `POET_TOKEN` overrides the stored token.
    pub fn load(dir: &Path) -> Result<Self, String> {
        Self::load_with_env_token(dir, std::env::var(TOKEN_ENV).ok())
    }

    /// Like [`Settings::load`], with the value of `POET_TOKEN` passed in.
    pub fn load_with_env_token(dir: &Path, env_token: Option<String>) -> Result<Self, String> {
        let json_path = dir.join(SETTINGS_FILE);
        let toml_path = dir.join(TOML_SETTINGS_FILE);

        let mut settings = if json_path.is_file() {
            let content = fs::read_to_string(&json_path)
                .map_err(|e| format!("Failed to read {}: {}", json_path.display(), e))?;
            serde_json::from_str(&content)
                .map_err(|e| format!("Invalid settings in {}: {}", json_path.display(), e))?
        } else if toml_path.is_file() {
            let content = fs::read_to_string(&toml_path)
                .map_err(|e| format!("Failed to read {}: {}", toml_path.display(), e))?;
            toml::from_str(&content)
                .map_err(|e| format!("Invalid settings in {}: {}", toml_path.display(), e))?
        } else {
            tracing::debug!(dir = %dir.display(), "no settings file found");
            Settings::default()
        };

        settings.env_token = env_token.filter(|token| !token.trim().is_empty());
        Ok(settings)
    }

    /// The token to call the service with: `POET_TOKEN` first, then the stored one.
    pub fn api_token(&self) -> Option<&str> {
        self.env_token.as_deref().or(self.token.as_deref())
    }

    /// Writes `poet.json` into `dir`. A token from the environment is left out.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, String> {
        let path = dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&path, content + "\n")
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        Ok(path)
    }

    /// Resolves the export root folder against `dir`.
    pub fn output_dir(&self, dir: &Path) -> PathBuf {
        let folder = self
            .output_folder
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_FOLDER);
        let folder = Path::new(folder);
        if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            dir.join(folder)
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            untranslated: self.untranslated,
            missing_extension: match &self.default_name {
                Some(name) => ExtensionPolicy::DefaultName(name.clone()),
                None => ExtensionPolicy::Skip,
            },
            parallel: false,
        }
    }
}
