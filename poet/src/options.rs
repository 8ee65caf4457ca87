//! Policies that control how an export treats incomplete service data.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Base name used by [`ExtensionPolicy::DefaultName`] unless configured otherwise.
pub const DEFAULT_BASE_NAME: &str = "Localizable";

/// What to do with terms that have no translation yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UntranslatedPolicy {
    /// Leave the term out of the string table.
    #[default]
    Skip,
    /// Write the term itself as its value.
    FallbackToTerm,
}

/// What to do with contexts whose name has no file extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionPolicy {
    /// Write no files for the context.
    #[default]
    Skip,
    /// Write the context's files under this base name.
    DefaultName(String),
}

impl ExtensionPolicy {
    pub fn default_name() -> Self {
        ExtensionPolicy::DefaultName(DEFAULT_BASE_NAME.to_string())
    }
}

/// Options for one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub untranslated: UntranslatedPolicy,
    pub missing_extension: ExtensionPolicy,
    /// Export languages on the rayon thread pool instead of one after another.
    pub parallel: bool,
}

impl ExportOptions {
    /// Resolves the output base name for a context.
    ///
    /// The base name is the last path component of the context without its extension.
    /// `None` means no files should be written for this context.
    pub fn base_name(&self, context: &str) -> Option<String> {
        let stem = Path::new(context)
            .file_name()
            .map(Path::new)
            .filter(|file_name| file_name.extension().is_some())
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty());

        match (stem, &self.missing_extension) {
            (Some(stem), _) => Some(stem.to_string()),
            (None, ExtensionPolicy::Skip) => None,
            (None, ExtensionPolicy::DefaultName(name)) => Some(name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories_and_extension() {
        let options = ExportOptions::default();
        assert_eq!(options.base_name("Main.strings").as_deref(), Some("Main"));
        assert_eq!(
            options.base_name("App/Base.lproj/Main.storyboard").as_deref(),
            Some("Main")
        );
        assert_eq!(
            options.base_name("Settings.bundle.strings").as_deref(),
            Some("Settings.bundle")
        );
    }

    #[test]
    fn test_extensionless_context_skipped_by_default() {
        let options = ExportOptions::default();
        assert_eq!(options.base_name("Main"), None);
        assert_eq!(options.base_name(""), None);
        assert_eq!(options.base_name(".strings"), None);
    }

    #[test]
    fn test_extensionless_context_with_default_name() {
        let options = ExportOptions {
            missing_extension: ExtensionPolicy::default_name(),
            ..Default::default()
        };
        assert_eq!(options.base_name("").as_deref(), Some("Localizable"));
        assert_eq!(options.base_name("Main").as_deref(), Some("Localizable"));
        assert_eq!(options.base_name("Main.strings").as_deref(), Some("Main"));
    }

    #[test]
    fn test_options_deserialize() {
        let options: ExportOptions = serde_json::from_str(
            r#"{ "untranslated": "fallback-to-term", "missingExtension": { "default-name": "Strings" } }"#,
        )
        .unwrap();
        assert_eq!(options.untranslated, UntranslatedPolicy::FallbackToTerm);
        assert_eq!(
            options.missing_extension,
            ExtensionPolicy::DefaultName("Strings".to_string())
        );
        assert!(!options.parallel);
    }
}
