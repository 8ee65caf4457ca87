//! The export pipeline: decode → group by context → write `.strings` and `.stringsdict` files.
//!
//! Every language runs its own pipeline with no shared state, so [`Exporter::export_languages`]
//! can hand languages to the rayon pool when [`ExportOptions::parallel`] is set. Within a
//! language, contexts are written one after another in name order.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    decode::decode_records,
    error::Error,
    formats::{FormatType, StringsDictFormat, StringsFormat},
    group::group_by_context,
    locale::{lproj_dir_name, xcode_locale},
    options::ExportOptions,
    source::{ExportType, TranslationSource},
    traits::Document,
    types::ContextGroup,
};

/// Files written for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: String,
    pub directory: PathBuf,
    /// Written files, in write order.
    pub files: Vec<PathBuf>,
}

/// Outcome of a multi-language export, one result per language in processing order.
#[derive(Debug)]
pub struct ExportSummary {
    pub results: Vec<(String, Result<LanguageReport, Error>)>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.results
            .iter()
            .filter_map(|(language, result)| result.as_ref().err().map(|e| (language.as_str(), e)))
    }

    pub fn reports(&self) -> impl Iterator<Item = &LanguageReport> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().ok())
    }
}

/// Runs exports with a fixed set of [`ExportOptions`].
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Exports every language from `source` into `<root>/<xcode locale>.lproj/`.
    ///
    /// Languages are processed in sorted order. A failing language is recorded in the
    /// summary and does not stop the others.
    pub fn export_languages<S>(&self, source: &S, languages: &[String], root: &Path) -> ExportSummary
    where
        S: TranslationSource + Sync + ?Sized,
    {
        self.for_each_language(languages, |language| {
            self.export_from_source(source, language, root)
        })
    }

    /// Downloads every language as `export_type` into `<root>/<xcode locale>.<export type>`,
    /// without converting it.
    pub fn download_languages<S>(
        &self,
        source: &S,
        languages: &[String],
        root: &Path,
        export_type: ExportType,
    ) -> ExportSummary
    where
        S: TranslationSource + Sync + ?Sized,
    {
        self.for_each_language(languages, |language| {
            tracing::info!(language = %language, format = %export_type, "downloading");
            let data = source.fetch(language, export_type)?;
            let path = root.join(format!("{}.{}", xcode_locale(language), export_type));
            RawFile(&data).write_to(&path)?;
            tracing::info!(language = %language, "✓ {}", display_name(&path));

            Ok(LanguageReport {
                language: language.to_string(),
                directory: root.to_path_buf(),
                files: vec![path],
            })
        })
    }

    fn for_each_language<F>(&self, languages: &[String], export: F) -> ExportSummary
    where
        F: Fn(&str) -> Result<LanguageReport, Error> + Sync,
    {
        let mut languages = languages.to_vec();
        languages.sort();
        languages.dedup();

        let run = |language: &String| {
            let result = export(language.as_str()).map_err(|e| e.in_language(language.as_str()));
            if let Err(e) = &result {
                tracing::error!(language = %language, "export failed: {}", e);
            }
            (language.clone(), result)
        };

        let results = if self.options.parallel {
            languages.par_iter().map(run).collect()
        } else {
            languages.iter().map(run).collect()
        };

        ExportSummary { results }
    }

    fn export_from_source<S>(
        &self,
        source: &S,
        language: &str,
        root: &Path,
    ) -> Result<LanguageReport, Error>
    where
        S: TranslationSource + ?Sized,
    {
        tracing::info!(language = %language, "exporting");
        let raw = source.fetch(language, ExportType::Json)?;
        self.export_language(language, &raw, &root.join(lproj_dir_name(language)))
    }

    /// Exports one language's raw JSON into `dest`.
    ///
    /// A decode failure writes nothing. A write failure is reported after the remaining
    /// contexts have been attempted; files written up to then stay on disk.
    pub fn export_language(
        &self,
        language: &str,
        raw: &[u8],
        dest: &Path,
    ) -> Result<LanguageReport, Error> {
        let entries = decode_records(raw)?;
        tracing::debug!(language = %language, entries = entries.len(), "decoded export");

        let groups = group_by_context(entries);

        std::fs::create_dir_all(dest).map_err(|e| Error::file_system(dest, e))?;

        let mut files = Vec::new();
        let mut first_error = None;

        for (base_name, group) in self.plan_outputs(groups) {
            match self.write_group(&base_name, &group, dest) {
                Ok(written) => {
                    for path in written {
                        tracing::info!(language = %language, "✓ {}", display_name(&path));
                        files.push(path);
                    }
                }
                Err(e) => {
                    let e = e.in_context(group.name.as_str());
                    tracing::warn!(language = %language, "{}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(LanguageReport {
                language: language.to_string(),
                directory: dest.to_path_buf(),
                files,
            }),
        }
    }

    /// Pairs each context with its output base name, in context order.
    ///
    /// Contexts without a base name are dropped. Contexts that resolve to a base name
    /// already taken are appended to the earlier group rather than overwriting its files.
    fn plan_outputs(&self, groups: Vec<ContextGroup>) -> Vec<(String, ContextGroup)> {
        let mut planned: Vec<(String, ContextGroup)> = Vec::new();
        let mut by_base_name: HashMap<String, usize> = HashMap::new();

        for group in groups {
            let Some(base_name) = self.options.base_name(&group.name) else {
                tracing::info!(context = %group.name, "skipping context without file extension");
                continue;
            };

            match by_base_name.get(&base_name) {
                Some(&index) => {
                    tracing::warn!(
                        context = %group.name,
                        into = %planned[index].1.name,
                        "context writes to the same file as an earlier one, merging"
                    );
                    planned[index].1.entries.extend(group.entries);
                }
                None => {
                    by_base_name.insert(base_name.clone(), planned.len());
                    planned.push((base_name, group));
                }
            }
        }

        planned
    }

    fn write_group(
        &self,
        base_name: &str,
        group: &ContextGroup,
        dest: &Path,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();

        let table = StringsFormat::from_group(group, self.options.untranslated);
        if !table.is_empty() {
            let path = dest.join(FormatType::Strings.file_name(base_name));
            table.write_to(&path)?;
            written.push(path);
        }

        let dict = StringsDictFormat::from_group(group);
        if !dict.is_empty() {
            let path = dest.join(FormatType::StringsDict.file_name(base_name));
            dict.write_to(&path)?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Downloaded bytes, written as they are.
struct RawFile<'a>(&'a [u8]);

impl Document for RawFile<'_> {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.0).map_err(Error::Io)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
