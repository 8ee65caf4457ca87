//! Implementations of the `poet` subcommands.
//!
//! Commands return `Err(String)` with a message for the user; `main` prints it and exits.

use std::path::{Path, PathBuf};

use poet::{
    DirectorySource, ExportSummary, ExportType, Exporter, ExtensionPolicy, TranslationSource,
    UntranslatedPolicy, formats::StringsFormat, traits::Parser,
};
use unicode_width::UnicodeWidthStr;

use crate::client::{Language, PoEditorClient};
use crate::settings::{SETTINGS_FILE, Settings};

#[derive(Debug, Clone, Default)]
pub struct ExportCommand {
    pub project: Option<u64>,
    pub languages: Vec<String>,
    pub output: Option<String>,
    pub from_dir: Option<String>,
    pub fallback_to_term: bool,
    pub default_name: Option<String>,
    pub parallel: bool,
    /// Download this file type as-is instead of converting to `.lproj` folders.
    pub format: Option<ExportType>,
}

pub fn run_projects(dir: &Path) -> Result<(), String> {
    let settings = Settings::load(dir)?;
    let client = client_for(&settings)?;

    let projects = client.list_projects().map_err(|e| e.to_string())?;
    if projects.is_empty() {
        return Err("No projects found.".to_string());
    }

    println!("Projects Available");
    println!("==================");
    for project in &projects {
        println!("\t{:>8}\t{}", project.id, project.name);
    }
    Ok(())
}

pub fn run_languages(
    dir: &Path,
    project: Option<u64>,
    min_percent: Option<f64>,
) -> Result<(), String> {
    let settings = Settings::load(dir)?;
    let client = client_for(&settings)?;
    let project_id = project_id(project, &settings)?;

    let languages = client
        .list_languages(project_id)
        .map_err(|e| e.to_string())?;

    println!("Languages Available");
    println!("===================");
    for line in format_languages(&select_languages(&languages, min_percent.unwrap_or(0.0))) {
        println!("\t{}", line);
    }
    Ok(())
}

/// Stores the project and every language at or above `min_percent` in `poet.json`.
pub fn run_init(dir: &Path, project: u64, min_percent: f64) -> Result<(), String> {
    let mut settings = Settings::load(dir)?;
    let client = client_for(&settings)?;

    let languages = client.list_languages(project).map_err(|e| e.to_string())?;
    let selected = select_languages(&languages, min_percent);
    if selected.is_empty() {
        return Err("No languages selected, aborting.".to_string());
    }

    settings.project_id = Some(project);
    settings.languages = selected.iter().map(|l| l.code.clone()).collect();
    let path = settings.save(dir)?;

    println!(
        "Setup complete. You may edit {} to change the exported languages.",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(SETTINGS_FILE)
    );
    Ok(())
}

pub fn run_export(dir: &Path, command: ExportCommand) -> Result<(), String> {
    let settings = Settings::load(dir)?;

    let languages = if command.languages.is_empty() {
        settings.languages.clone()
    } else {
        command.languages.clone()
    };
    if languages.is_empty() {
        return Err("No languages selected, aborting.".to_string());
    }

    let mut options = settings.export_options();
    if command.fallback_to_term {
        options.untranslated = UntranslatedPolicy::FallbackToTerm;
    }
    if let Some(name) = &command.default_name {
        options.missing_extension = ExtensionPolicy::DefaultName(name.clone());
    }
    options.parallel = command.parallel;

    let root = match &command.output {
        Some(output) => resolve(dir, output),
        None => settings.output_dir(dir),
    };

    let count = if languages.len() == 1 {
        "One language".to_string()
    } else {
        format!("{} languages", languages.len())
    };
    println!("{} will be exported to {}", count, root.display());

    let exporter = Exporter::new(options);
    let run = |source: &(dyn TranslationSource + Sync)| match command.format {
        Some(export_type) => exporter.download_languages(source, &languages, &root, export_type),
        None => exporter.export_languages(source, &languages, &root),
    };
    let summary = match &command.from_dir {
        Some(from_dir) => run(&DirectorySource::new(resolve(dir, from_dir))),
        None => {
            let client = client_for(&settings)?;
            let project_id = project_id(command.project, &settings)?;
            run(&client.project(project_id))
        }
    };

    print_summary(&summary);

    let failed = summary.failures().count();
    if failed > 0 {
        return Err(format!(
            "Export failed for {} of {} languages",
            failed,
            summary.results.len()
        ));
    }

    println!("Export complete");
    Ok(())
}

/// Prints the entries of a `.strings` file.
pub fn run_inspect(dir: &Path, file: &str) -> Result<(), String> {
    let path = resolve(dir, file);
    let table = StringsFormat::read_from(&path).map_err(|e| e.to_string())?;

    let width = table
        .pairs
        .iter()
        .map(|p| UnicodeWidthStr::width(p.key.as_str()))
        .max()
        .unwrap_or(0);

    for pair in &table.pairs {
        if let Some(comment) = &pair.comment {
            println!("# {}", comment);
        }
        println!("{} = {}", pad(&pair.key, width), pair.value.replace('\n', "\\n"));
    }
    println!("{} entries", table.pairs.len());
    Ok(())
}

fn print_summary(summary: &ExportSummary) {
    for (language, result) in &summary.results {
        match result {
            Ok(report) => println!(
                "✓ {} → {} ({} files)",
                language,
                report.directory.display(),
                report.files.len()
            ),
            Err(e) => eprintln!("✗ {}: {}", language, e),
        }
    }
}

/// Languages at or above `min_percent` completion, in service order.
pub fn select_languages(languages: &[Language], min_percent: f64) -> Vec<Language> {
    languages
        .iter()
        .filter(|l| l.percentage >= min_percent)
        .cloned()
        .collect()
}

/// One aligned line per language: code, name and completion.
pub fn format_languages(languages: &[Language]) -> Vec<String> {
    let code_width = languages
        .iter()
        .map(|l| UnicodeWidthStr::width(l.code.as_str()))
        .max()
        .unwrap_or(0)
        .max(5);
    let name_width = languages
        .iter()
        .map(|l| UnicodeWidthStr::width(l.name.as_str()))
        .max()
        .unwrap_or(0);

    languages
        .iter()
        .map(|l| {
            format!(
                "{}  {}  {:>6.2}%",
                pad(&l.code, code_width),
                pad(&l.name, name_width),
                l.percentage
            )
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(padding))
}

fn resolve(dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

fn client_for(settings: &Settings) -> Result<PoEditorClient, String> {
    let token = settings.api_token().ok_or_else(|| {
        format!(
            "No API token configured. Set POET_TOKEN or add \"token\" to {}",
            SETTINGS_FILE
        )
    })?;
    PoEditorClient::new(token).map_err(|e| e.to_string())
}

fn project_id(project: Option<u64>, settings: &Settings) -> Result<u64, String> {
    project.or(settings.project_id).ok_or_else(|| {
        format!(
            "No project selected. Pass --project or add \"projectID\" to {}",
            SETTINGS_FILE
        )
    })
}
