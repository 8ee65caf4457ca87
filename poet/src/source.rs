//! Where an export gets its raw translation records from.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// File types the translation service can export a language as.
///
/// [`ExportType::Json`] is what the Xcode conversion reads; the others are only downloaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    Po,
    Pot,
    Mo,
    Xls,
    Csv,
    Resw,
    Resx,
    AndroidStrings,
    AppleStrings,
    Xliff,
    Properties,
    KeyValueJson,
    #[default]
    Json,
}

impl ExportType {
    pub const ALL: [ExportType; 13] = [
        ExportType::Po,
        ExportType::Pot,
        ExportType::Mo,
        ExportType::Xls,
        ExportType::Csv,
        ExportType::Resw,
        ExportType::Resx,
        ExportType::AndroidStrings,
        ExportType::AppleStrings,
        ExportType::Xliff,
        ExportType::Properties,
        ExportType::KeyValueJson,
        ExportType::Json,
    ];

    /// The name the service uses for this type. Downloaded files use it as their extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportType::Po => "po",
            ExportType::Pot => "pot",
            ExportType::Mo => "mo",
            ExportType::Xls => "xls",
            ExportType::Csv => "csv",
            ExportType::Resw => "resw",
            ExportType::Resx => "resx",
            ExportType::AndroidStrings => "android_strings",
            ExportType::AppleStrings => "apple_strings",
            ExportType::Xliff => "xliff",
            ExportType::Properties => "properties",
            ExportType::KeyValueJson => "key_value_json",
            ExportType::Json => "json",
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        ExportType::ALL
            .into_iter()
            .find(|export_type| export_type.as_str() == s)
            .ok_or(Error::UnknownExportType(s))
    }
}

/// Supplies the raw export of a language.
///
/// The HTTP client in `poet-cli` implements this against the POEditor API;
/// [`DirectorySource`] reads previously downloaded files.
pub trait TranslationSource {
    fn fetch(&self, language: &str, export_type: ExportType) -> Result<Vec<u8>, Error>;
}

/// Reads `<dir>/<language>.<export type>`, e.g. `de.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, language: &str, export_type: ExportType) -> PathBuf {
        self.dir.join(format!("{}.{}", language, export_type))
    }
}

impl TranslationSource for DirectorySource {
    fn fetch(&self, language: &str, export_type: ExportType) -> Result<Vec<u8>, Error> {
        let path = self.path_for(language, export_type);
        std::fs::read(&path).map_err(|e| Error::file_system(path, e))
    }
}

impl<T: TranslationSource + ?Sized> TranslationSource for &T {
    fn fetch(&self, language: &str, export_type: ExportType) -> Result<Vec<u8>, Error> {
        (**self).fetch(language, export_type)
    }
}
